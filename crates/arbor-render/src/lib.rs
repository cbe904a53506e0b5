//! # Arbor Render
//!
//! Traversal systems over Arbor scenes. [`system::process`] walks a
//! viewport's sub-scene depth-first, threading per-system state from parents
//! to children; [`DrawingSystem`] uses it to hand model/view/projection
//! matrices to visuals and to set up each viewport's region on a
//! [`RenderBackend`].

pub mod backend;
pub mod system;
pub mod draw;
pub mod model;
pub mod canvas;

#[cfg(test)]
mod testing;

pub use backend::{BackendCommand, RecordingBackend, RenderBackend};
pub use canvas::Canvas;
pub use draw::{DrawState, DrawingSystem};
pub use model::{ModelTransformSystem, Placement};
pub use system::{process, System};
