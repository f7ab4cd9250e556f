//! Application configuration.

use seepain_core::{CanvasConfig, ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration, read from `config.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    /// Body sketch drawn behind the strokes. Relative paths are resolved
    /// against the directory of the config file.
    pub background_image: Option<PathBuf>,
    /// Where saved images go; platform download directory when unset.
    pub save_dir: Option<PathBuf>,
}

impl AppConfig {
    /// `<config dir>/seepain/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("seepain").join("config.json"))
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.canvas.validate()?;
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
        let mut config = Self::from_json(&json)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path`, or the default location when `None`.
    ///
    /// A missing file is not an error: defaults are used instead. A file
    /// that exists but does not parse is.
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => {
                    log::warn!("No configuration directory on this platform, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        if !path.exists() {
            log::warn!("No configuration at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [&mut self.background_image, &mut self.save_dir]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_or_default(Some(&dir.path().join("nope.json"))).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{
                "canvas": { "eraser_radius": 25.0 },
                "background_image": "body.png",
                "save_dir": "/data/exports"
            }"#,
        )
        .unwrap();

        let config = AppConfig::load_or_default(Some(&path)).unwrap();
        assert!((config.canvas.eraser_radius - 25.0).abs() < f64::EPSILON);
        assert!((config.canvas.max_zoom - 5.0).abs() < f64::EPSILON);
        assert_eq!(config.background_image, Some(dir.path().join("body.png")));
        assert_eq!(config.save_dir, Some(PathBuf::from("/data/exports")));
    }

    #[test]
    fn test_invalid_canvas_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "canvas": { "zoom_step": 0.5 } }"#).unwrap();

        let result = AppConfig::load_or_default(Some(&path));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = AppConfig::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig {
            save_dir: Some(PathBuf::from("/tmp/seepain")),
            ..AppConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(AppConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_default_path_location() {
        if let Some(path) = AppConfig::default_path() {
            assert!(path.ends_with("seepain/config.json"));
        }
    }
}
