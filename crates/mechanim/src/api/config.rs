use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::renderer::style::RenderStyle;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid view config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for a mechanism view, provided by the mechanism.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Radians added to the rotation each frame while auto-rotating (default: 0.006).
    pub rotation_step: f32,
    /// Rotation at mount time.
    pub initial_rotation: f32,
    /// Whether the view starts rotating (default: true).
    pub auto_rotate: bool,
    /// Fixed tilt about the X axis, applied after the live yaw.
    pub pitch: f32,
    pub style: RenderStyle,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            rotation_step: 0.006,
            initial_rotation: 0.0,
            auto_rotate: true,
            pitch: 0.0,
            style: RenderStyle::default(),
        }
    }
}

impl ViewConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
