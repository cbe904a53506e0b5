//! Generic pre-order traversal of a viewport's sub-scene.
//!
//! A [`System`] threads its own state down the tree: `init` produces the
//! state for a viewport's top-level entities, and `visit` turns the state an
//! entity receives into the state its children receive. Nested viewports
//! restart the protocol with their own `init`.

use arbor_core::{EntityId, Result, Scene, SceneError};

/// A task performed over the entities of a viewport (drawing, picking, ...).
pub trait System {
    /// State handed from a node to its children.
    type State;

    /// Called once per viewport before its sub-scene is visited. `outer` is
    /// the state the viewport's own visit produced in the enclosing scene,
    /// `None` for the root viewport.
    fn init(&mut self, scene: &Scene, viewport: EntityId, outer: Option<&Self::State>) -> Result<Self::State>;

    /// Called once per entity, parents before children.
    fn visit(&mut self, scene: &Scene, entity: EntityId, state: &Self::State) -> Result<Self::State>;

    /// Called after a viewport's sub-scene has been fully visited.
    fn finish(&mut self, _scene: &Scene, _viewport: EntityId) -> Result<()> {
        Ok(())
    }
}

/// Run `system` over the sub-scene of `viewport`.
///
/// Errors from any step abort the traversal and are returned unchanged.
pub fn process<S: System + ?Sized>(system: &mut S, scene: &Scene, viewport: EntityId) -> Result<()> {
    Traversal {
        system,
        scene,
        active: Vec::new(),
    }
    .viewport(viewport, None)
}

struct Traversal<'a, S: System + ?Sized> {
    system: &'a mut S,
    scene: &'a Scene,
    /// Viewports currently being traversed, outermost first.
    active: Vec<EntityId>,
}

impl<S: System + ?Sized> Traversal<'_, S> {
    fn viewport(&mut self, viewport: EntityId, outer: Option<&S::State>) -> Result<()> {
        if !self.scene.get(viewport)?.is_viewport() {
            return Err(SceneError::TypeConstraint(viewport, "viewport"));
        }
        if self.active.contains(&viewport) {
            return Err(SceneError::RecursiveViewport(viewport));
        }
        log::debug!(
            "Processing viewport {:?} at depth {}",
            viewport,
            self.active.len()
        );

        self.active.push(viewport);
        let state = self.system.init(self.scene, viewport, outer)?;
        for entity in self.scene.sub_scene(viewport)? {
            self.entity(entity, &state)?;
        }
        self.system.finish(self.scene, viewport)?;
        self.active.pop();
        Ok(())
    }

    fn entity(&mut self, entity: EntityId, state: &S::State) -> Result<()> {
        log::trace!("Visiting entity {:?}", entity);
        let next = self.system.visit(self.scene, entity, state)?;

        let scene = self.scene;
        let node = scene.get(entity)?;
        if node.is_viewport() {
            // A nested viewport renders its own sub-scene with its own camera.
            return self.viewport(entity, Some(&next));
        }
        for &child in node.children() {
            self.entity(child, &next)?;
        }
        Ok(())
    }
}
