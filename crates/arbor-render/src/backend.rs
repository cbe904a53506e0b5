use arbor_core::{Color, Region};
use serde::Serialize;

/// The two graphics primitives a viewport needs from the rendering backend.
pub trait RenderBackend {
    /// Make `region` the active rectangle and enable rectangular clipping.
    fn set_region(&mut self, region: &Region);

    /// Clear the active rectangle to `color`.
    fn clear(&mut self, color: Color);
}

/// A backend call, as recorded by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum BackendCommand {
    SetRegion(Region),
    Clear(Color),
}

/// Backend that records calls instead of issuing them.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub commands: Vec<BackendCommand>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.commands)
    }
}

impl RenderBackend for RecordingBackend {
    fn set_region(&mut self, region: &Region) {
        self.commands.push(BackendCommand::SetRegion(*region));
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(BackendCommand::Clear(color));
    }
}
