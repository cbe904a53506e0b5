//! # Arbor Core
//!
//! Scene graph for the Arbor renderer: an arena of entities with local
//! transforms, cameras that resolve their view matrix from the hierarchy,
//! viewports that bound a sub-scene and a screen region, and worlds that
//! several viewports can share.
//!
//! Drawing and other traversals live in `arbor-render`.

pub mod transform;
pub mod color;
pub mod error;
pub mod entity;
pub mod camera;
pub mod viewport;
pub mod world;
pub mod visual;
pub mod scene;

pub use camera::{CameraData, Orbit, Projection};
pub use color::Color;
pub use entity::{Entity, EntityKind, Owner};
pub use error::{Result, SceneError, VisualError};
pub use scene::{EntityId, Scene, WorldId};
pub use transform::Transform;
pub use viewport::{ClipMode, Region, SubScene, ViewportData};
pub use visual::{SharedVisual, TransformUniforms, Visual};
pub use world::World;
