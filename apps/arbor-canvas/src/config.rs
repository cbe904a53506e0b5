use std::fs;
use std::path::Path;

use arbor_core::{Color, SceneError};
use serde::{Deserialize, Serialize};

/// Host settings, read from an optional JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    /// 3 or 4 floats.
    pub bgcolor: Vec<f32>,
    /// Pretty-print the frame report.
    pub pretty: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            bgcolor: vec![0.0, 0.0, 0.0, 1.0],
            pretty: true,
        }
    }
}

impl CanvasConfig {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded canvas config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn background(&self) -> Result<Color, SceneError> {
        Color::from_slice(&self.bgcolor)
    }
}
