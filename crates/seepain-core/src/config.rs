//! Canvas configuration.

use crate::tools::Level;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for the annotation canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Smallest zoom the user can reach.
    pub min_zoom: f64,
    /// Largest zoom the user can reach.
    pub max_zoom: f64,
    /// Zoom factor applied by the zoom in/out buttons.
    pub zoom_step: f64,
    /// Eraser reach in screen units.
    pub eraser_radius: f64,
    /// Diameter of the eraser indicator circle.
    pub eraser_indicator_diameter: f64,
    /// Pain intensity selected at startup.
    pub default_pain_level: Level,
    /// Pencil level selected at startup.
    pub default_pencil_level: Level,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.5,
            max_zoom: 5.0,
            zoom_step: 1.25,
            eraser_radius: 20.0,
            eraser_indicator_diameter: 30.0,
            default_pain_level: Level::MAX,
            default_pencil_level: Level::from_slider(2.0),
        }
    }
}

impl CanvasConfig {
    /// Check ranges that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if !self.max_zoom.is_finite() || self.max_zoom < self.min_zoom {
            return Err(ConfigError::Invalid(format!(
                "max_zoom ({}) must not be below min_zoom ({})",
                self.max_zoom, self.min_zoom
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom_step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if !(self.eraser_radius > 0.0 && self.eraser_indicator_diameter > 0.0) {
            return Err(ConfigError::Invalid(
                "eraser sizes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}
