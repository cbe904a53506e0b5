use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{Result, SceneError};
use crate::scene::{EntityId, WorldId};
use crate::transform::Transform;

/// Where a viewport's sub-scene comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubScene {
    /// The viewport's own children.
    #[default]
    Children,
    /// A world shared with other viewports.
    World(WorldId),
}

/// Viewport payload of an entity.
#[derive(Debug, Clone, Default)]
pub struct ViewportData {
    pub(crate) bgcolor: Color,
    /// Active camera, resolved lazily on first access.
    pub(crate) camera: Cell<Option<EntityId>>,
    pub(crate) source: SubScene,
}

impl ViewportData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bgcolor(&self) -> Color {
        self.bgcolor
    }

    pub fn source(&self) -> SubScene {
        self.source
    }
}

/// Pixel resolution encoded in a viewport transform's scale diagonal.
/// Truncated toward zero and never negative.
pub fn resolution_of(transform: &Transform) -> (u32, u32) {
    let (w, h) = transform.scale_xy();
    (w.max(0.0) as u32, h.max(0.0) as u32)
}

/// Strategy used to confine a viewport's rendering to its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipMode {
    /// Axis-aligned, pixel-exact: a viewport rectangle plus scissor test.
    Scissor,
    /// Rotated, sheared or fractionally scaled: needs an intermediate target.
    Offscreen,
}

/// The screen area a viewport renders into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub mode: ClipMode,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Classify the region described by a viewport's accumulated transform.
///
/// Scale carries the pixel size and translation the pixel origin. Any
/// rotation/shear, or a size that differs from `resolution`, rules out a
/// plain scissor rectangle.
pub fn analyze_region(resolution: (u32, u32), accumulated: &Transform) -> Region {
    let (sw, sh) = accumulated.scale_xy();
    let (tx, ty) = accumulated.translation_xy();

    let offscreen = accumulated.has_off_diagonal()
        || sw != resolution.0 as f32
        || sh != resolution.1 as f32;

    Region {
        mode: if offscreen {
            ClipMode::Offscreen
        } else {
            ClipMode::Scissor
        },
        x: tx as i32,
        y: ty as i32,
        width: sw.max(0.0) as u32,
        height: sh.max(0.0) as u32,
    }
}

/// Resolve the region for `viewport`, refusing layouts that would need
/// off-screen compositing.
pub fn resolve_render_region(
    viewport: EntityId,
    resolution: (u32, u32),
    accumulated: &Transform,
) -> Result<Region> {
    let region = analyze_region(resolution, accumulated);
    match region.mode {
        ClipMode::Scissor => Ok(region),
        ClipMode::Offscreen => {
            log::warn!(
                "Viewport {:?} at {:?} is not an axis-aligned pixel rectangle",
                viewport,
                region
            );
            Err(SceneError::UnsupportedClipping(viewport))
        }
    }
}
