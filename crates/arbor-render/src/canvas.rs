use arbor_core::{EntityId, Result, Scene};

use crate::backend::RenderBackend;
use crate::draw::DrawingSystem;
use crate::system::process;

/// A screen surface with a root viewport kept in sync with its size.
///
/// The root viewport has no parent; everything drawn on the canvas lives
/// under it.
#[derive(Debug)]
pub struct Canvas {
    scene: Scene,
    root: EntityId,
}

impl Canvas {
    pub fn new(name: &str, width: u32, height: u32) -> Result<Self> {
        let mut scene = Scene::new(name);
        let root = scene.spawn_viewport("root", None)?;
        scene.resize_viewport(root, width, height)?;
        Ok(Self { scene, root })
    }

    /// The root viewport.
    pub fn root(&self) -> EntityId {
        self.root
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn size(&self) -> Result<(u32, u32)> {
        self.scene.resolution(self.root)
    }

    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.scene.resize_viewport(self.root, width, height)
    }

    /// Draw one frame. Returns the number of visuals drawn.
    pub fn on_paint<B: RenderBackend + ?Sized>(&self, backend: &mut B) -> Result<usize> {
        let mut system = DrawingSystem::new(backend);
        if let Err(err) = process(&mut system, &self.scene, self.root) {
            log::error!("Frame aborted on scene {}: {}", self.scene.id, err);
            return Err(err);
        }
        log::debug!("Frame drew {} visuals", system.draw_count());
        Ok(system.draw_count())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::backend::{BackendCommand, RecordingBackend};
    use crate::testing::RecordingVisual;
    use arbor_core::{ClipMode, EntityKind, Projection, SceneError};

    #[test]
    fn test_canvas_root_tracks_size() {
        let mut canvas = Canvas::new("test", 640, 480).unwrap();
        assert_eq!(canvas.size().unwrap(), (640, 480));
        canvas.on_resize(1024, 768).unwrap();
        assert_eq!(canvas.size().unwrap(), (1024, 768));
        assert_eq!(canvas.scene().parent(canvas.root()).unwrap(), None);
    }

    #[test]
    fn test_paint_after_resize() {
        let mut canvas = Canvas::new("test", 640, 480).unwrap();
        let root = canvas.root();
        let scene = canvas.scene_mut();
        scene.spawn_camera("cam", Projection::Pixel, Some(root)).unwrap();
        let thing = scene.spawn("thing", EntityKind::Plain, Some(root)).unwrap();
        let visual = Rc::new(RefCell::new(RecordingVisual::default()));
        scene.set_visual(thing, Some(visual.clone())).unwrap();

        canvas.on_resize(320, 200).unwrap();
        let mut backend = RecordingBackend::new();
        assert_eq!(canvas.on_paint(&mut backend).unwrap(), 1);
        match &backend.commands[0] {
            BackendCommand::SetRegion(region) => {
                assert_eq!(region.mode, ClipMode::Scissor);
                assert_eq!((region.width, region.height), (320, 200));
            }
            other => panic!("unexpected first command {:?}", other),
        }
        assert_eq!(
            visual.borrow().last_vars.unwrap().transform_projection,
            Projection::Pixel.matrix((320, 200))
        );
    }

    #[test]
    fn test_paint_without_camera_aborts_frame() {
        let canvas = Canvas::new("test", 10, 10).unwrap();
        let mut backend = RecordingBackend::new();
        assert_eq!(
            canvas.on_paint(&mut backend),
            Err(SceneError::NoCamera(canvas.root()))
        );
    }
}
