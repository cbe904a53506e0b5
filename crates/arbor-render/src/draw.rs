use arbor_core::viewport::resolve_render_region;
use arbor_core::{EntityId, Region, Result, Scene, SceneError, Transform, TransformUniforms};

use crate::backend::RenderBackend;
use crate::system::System;

/// State threaded through a drawing traversal.
///
/// View and projection travel with the model transform so that a nested
/// viewport's camera never leaks into its parent's remaining entities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawState {
    pub model: Transform,
    pub view: Transform,
    pub projection: Transform,
}

/// Draws every visual of a viewport's sub-scene through a [`RenderBackend`].
pub struct DrawingSystem<'a, B: RenderBackend + ?Sized> {
    backend: &'a mut B,
    /// Regions of the viewports being drawn, outermost first.
    regions: Vec<Region>,
    draw_count: usize,
}

impl<'a, B: RenderBackend + ?Sized> DrawingSystem<'a, B> {
    pub fn new(backend: &'a mut B) -> Self {
        Self {
            backend,
            regions: Vec::new(),
            draw_count: 0,
        }
    }

    /// Visuals drawn so far.
    pub fn draw_count(&self) -> usize {
        self.draw_count
    }

    pub fn backend(&self) -> &B {
        &*self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut *self.backend
    }
}

impl<B: RenderBackend + ?Sized> System for DrawingSystem<'_, B> {
    type State = DrawState;

    fn init(&mut self, scene: &Scene, viewport: EntityId, outer: Option<&DrawState>) -> Result<DrawState> {
        let camera = scene
            .active_camera(viewport)?
            .ok_or(SceneError::NoCamera(viewport))?;
        let view = scene.resolve_view_transform(camera)?;
        let projection = scene.projection(camera, viewport)?;

        // A new frame. Regions left over from an aborted one are dropped.
        if outer.is_none() {
            self.regions.clear();
        }

        // The root viewport is placed by its own transform; nested ones by
        // the model transform accumulated in the enclosing scene.
        let placement = match outer {
            Some(state) => state.model,
            None => *scene.transform(viewport)?,
        };
        let region = resolve_render_region(viewport, scene.resolution(viewport)?, &placement)?;
        log::debug!(
            "Viewport {:?}: camera {:?}, region {}x{}+{}+{}",
            viewport,
            camera,
            region.width,
            region.height,
            region.x,
            region.y
        );

        self.backend.set_region(&region);
        self.backend.clear(scene.bgcolor(viewport)?);
        self.regions.push(region);

        Ok(DrawState {
            model: Transform::IDENTITY,
            view,
            projection,
        })
    }

    fn visit(&mut self, scene: &Scene, entity: EntityId, state: &DrawState) -> Result<DrawState> {
        let node = scene.get(entity)?;
        let model = state.model.compose(&node.transform);

        if let Some(visual) = node.visual() {
            let vars = TransformUniforms {
                transform_model: model,
                transform_view: state.view,
                transform_projection: state.projection,
            };
            let mut visual = visual.borrow_mut();
            visual.set_vars(&vars);
            visual
                .draw()
                .map_err(|source| SceneError::Draw { entity, source })?;
            self.draw_count += 1;
        }

        Ok(DrawState { model, ..*state })
    }

    fn finish(&mut self, _scene: &Scene, _viewport: EntityId) -> Result<()> {
        self.regions.pop();
        // Hand the rectangle back to the enclosing viewport.
        if let Some(region) = self.regions.last() {
            self.backend.set_region(region);
        }
        Ok(())
    }
}
