use thiserror::Error;

use crate::scene::{EntityId, WorldId};

/// Errors raised while building or rendering a scene.
///
/// None of these are recovered internally; they surface to the host's render
/// loop, which aborts the current frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("Invalid parent for entity {child:?}: {reason}")]
    InvalidParent { child: EntityId, reason: String },

    #[error("Background color must have 3 or 4 components, got {0}")]
    InvalidColor(usize),

    #[error("Viewport {0:?} has no camera in its sub-scene")]
    NoCamera(EntityId),

    #[error("Viewport {0:?} needs off-screen compositing, which is not supported")]
    UnsupportedClipping(EntityId),

    #[error("Entity {0:?} is not a {1}")]
    TypeConstraint(EntityId, &'static str),

    #[error("Viewport {0:?} is already being traversed; its sub-scene contains itself")]
    RecursiveViewport(EntityId),

    #[error("Unknown entity {0:?}")]
    UnknownEntity(EntityId),

    #[error("Unknown world {0:?}")]
    UnknownWorld(WorldId),

    #[error("World {0:?} is still referenced by a viewport")]
    WorldInUse(WorldId),

    #[error("Camera {0:?} has a singular transform chain")]
    SingularTransform(EntityId),

    #[error("Visual of entity {entity:?} failed to draw: {source}")]
    Draw { entity: EntityId, source: VisualError },
}

/// Failure reported by a [`Visual`](crate::Visual) while drawing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VisualError {
    #[error("Shader program unavailable: {0}")]
    Program(String),

    #[error("Missing uniform {0}")]
    MissingUniform(&'static str),

    #[error("Draw call failed: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, SceneError>;
