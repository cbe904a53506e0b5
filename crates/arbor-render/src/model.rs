use arbor_core::{EntityId, Result, Scene, Transform};

use crate::system::System;

/// Where an entity ended up during a traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub entity: EntityId,
    /// The viewport whose sub-scene the entity was reached through.
    pub viewport: EntityId,
    /// Entity-to-viewport-scene transform.
    pub model: Transform,
}

/// Records the accumulated model transform of every entity it visits, for
/// consumers such as picking and event dispatch that need scene-space
/// placement without drawing.
///
/// An entity rendered through several viewports (via a shared world) gets
/// one placement per viewport. Each run from a root viewport starts a fresh
/// record.
#[derive(Debug, Default)]
pub struct ModelTransformSystem {
    placements: Vec<Placement>,
    viewports: Vec<EntityId>,
}

impl ModelTransformSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placements in visiting order.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placements_of(&self, entity: EntityId) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.entity == entity)
    }
}

impl System for ModelTransformSystem {
    type State = Transform;

    fn init(&mut self, _scene: &Scene, viewport: EntityId, outer: Option<&Transform>) -> Result<Transform> {
        if outer.is_none() {
            self.placements.clear();
            self.viewports.clear();
        }
        self.viewports.push(viewport);
        Ok(Transform::IDENTITY)
    }

    fn visit(&mut self, scene: &Scene, entity: EntityId, model: &Transform) -> Result<Transform> {
        let model = model.compose(scene.transform(entity)?);
        if let Some(&viewport) = self.viewports.last() {
            self.placements.push(Placement {
                entity,
                viewport,
                model,
            });
        }
        Ok(model)
    }

    fn finish(&mut self, _scene: &Scene, _viewport: EntityId) -> Result<()> {
        self.viewports.pop();
        Ok(())
    }
}
