//! Headless Arbor host.
//!
//! Builds a small scene on a canvas (a camera, a few placed visuals and an
//! inset viewport with its own camera), paints one frame into a recording
//! backend and prints what the backend was asked to do as JSON.
//!
//! Usage: `arbor-canvas [config.json]`

mod config;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use arbor_core::{
    EntityKind, Projection, Scene, SceneError, Transform, TransformUniforms, Visual, VisualError,
};
use arbor_render::{BackendCommand, Canvas, RecordingBackend};
use serde::Serialize;

use crate::config::CanvasConfig;

/// Visual that logs the matrices it receives instead of drawing.
#[derive(Debug)]
struct LogVisual {
    label: String,
    vars: Option<TransformUniforms>,
}

impl LogVisual {
    fn shared(label: &str) -> Rc<RefCell<LogVisual>> {
        Rc::new(RefCell::new(LogVisual {
            label: label.to_string(),
            vars: None,
        }))
    }
}

impl Visual for LogVisual {
    fn set_vars(&mut self, vars: &TransformUniforms) {
        self.vars = Some(*vars);
    }

    fn draw(&mut self) -> Result<(), VisualError> {
        let vars = self
            .vars
            .ok_or(VisualError::MissingUniform("transform_model"))?;
        for (name, value) in vars.named() {
            log::debug!("{} {} = {:?}", self.label, name, value.to_cols_array());
        }
        log::info!("Drew {}", self.label);
        Ok(())
    }
}

/// What one paint produced.
#[derive(Debug, Serialize)]
struct FrameReport {
    scene: String,
    size: (u32, u32),
    entities: usize,
    draws: usize,
    commands: Vec<BackendCommand>,
}

fn build_scene(canvas: &mut Canvas, config: &CanvasConfig) -> Result<(), SceneError> {
    let root = canvas.root();
    let (width, height) = (config.width as f32, config.height as f32);
    let scene: &mut Scene = canvas.scene_mut();

    let background = config.background()?;
    scene.set_bgcolor(root, &background.to_array())?;
    scene.spawn_camera("pixel_camera", Projection::Pixel, Some(root))?;

    let group = scene.spawn("group", EntityKind::Plain, Some(root))?;
    scene.set_transform(group, Transform::from_translation(0.5 * width, 0.5 * height, 0.0))?;
    for (i, name) in ["left_marker", "right_marker"].iter().enumerate() {
        let offset = if i == 0 { -100.0 } else { 100.0 };
        let marker = scene.spawn(name, EntityKind::Plain, Some(group))?;
        scene.set_transform(marker, Transform::from_translation(offset, 0.0, 0.0))?;
        scene.set_visual(marker, Some(LogVisual::shared(name)))?;
    }

    // Inset in the top-left quarter, looking at its own 2D sub-scene.
    let inset = scene.spawn_viewport("inset", Some(root))?;
    let mut placement = Transform::IDENTITY;
    placement.set_scale_xy((width / 4.0).trunc(), (height / 4.0).trunc());
    placement.set_translation(10.0, 10.0, 0.0);
    scene.set_transform(inset, placement)?;
    scene.set_bgcolor(inset, &[0.2, 0.2, 0.25])?;

    let camera = scene.spawn_camera("inset_camera", Projection::TwoD { fov: (1.0, 1.0) }, Some(inset))?;
    scene.set_limits(camera, (-2.0, 2.0), (-1.5, 1.5))?;
    let curve = scene.spawn("curve", EntityKind::Plain, Some(inset))?;
    scene.set_visual(curve, Some(LogVisual::shared("curve")))?;

    log::info!("Built scene with {} entities", scene.len());
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => CanvasConfig::load(Path::new(&path))?,
        None => CanvasConfig::default(),
    };

    let mut canvas = Canvas::new("arbor-canvas", config.width, config.height)?;
    build_scene(&mut canvas, &config)?;
    canvas.on_resize(config.width, config.height)?;

    let mut backend = RecordingBackend::new();
    let draws = canvas.on_paint(&mut backend)?;

    let report = FrameReport {
        scene: canvas.scene().name.clone(),
        size: canvas.size()?,
        entities: canvas.scene().len(),
        draws,
        commands: backend.commands,
    };
    let json = if config.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{}", json);
    Ok(())
}
