//! Where saved images go.

use crate::session::{SessionError, SessionResult};
use seepain_render::validate_file_name;
use std::path::{Path, PathBuf};

/// Extension of saved images.
pub const IMAGE_EXTENSION: &str = "png";

/// Pick the save directory: configured, else downloads, else the working directory.
pub fn resolve_save_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured {
        return dir.to_path_buf();
    }
    if let Some(dir) = dirs::download_dir() {
        return dir;
    }
    log::warn!("No download directory on this platform, saving to the working directory");
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Maps a patient pseudonym to `<dir>/<pseudonym>.png`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveLocation {
    dir: PathBuf,
}

impl SaveLocation {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Location following the configured directory or the platform fallbacks.
    pub fn from_config(configured: Option<&Path>) -> Self {
        Self::new(resolve_save_dir(configured))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Target file for a pseudonym. Surrounding whitespace is ignored.
    pub fn path_for(&self, pseudonym: &str) -> SessionResult<PathBuf> {
        let pseudonym = pseudonym.trim();
        if pseudonym.is_empty() {
            return Err(SessionError::MissingPseudonym);
        }
        let file_name = format!("{}.{}", pseudonym, IMAGE_EXTENSION);
        validate_file_name(&file_name)?;
        Ok(self.dir.join(file_name))
    }
}
