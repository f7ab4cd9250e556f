//! PNG export of the annotated sketch.

use crate::renderer::{RenderContext, Renderer, RendererError, RgbaFrame};
use seepain_core::AnnotationCanvas;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid file name: {0}")]
    InvalidPath(String),
    #[error("Failed to write {}: {source}", path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("An export is already in progress")]
    Busy,
    #[error("PNG encoding failed: {0}")]
    Encode(String),
    #[error(transparent)]
    Render(#[from] RendererError),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Characters rejected by at least one common filesystem.
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Device names Windows refuses as file stems.
const RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Check a bare file name (no directories) for portability.
pub fn validate_file_name(name: &str) -> ExportResult<()> {
    if name.trim().is_empty() {
        return Err(ExportError::InvalidPath("file name is empty".to_string()));
    }
    if let Some(c) = name.chars().find(|c| c.is_control() || ILLEGAL_CHARS.contains(c)) {
        return Err(ExportError::InvalidPath(format!(
            "{:?} contains illegal character {:?}",
            name, c
        )));
    }
    if name.ends_with('.') || name.ends_with(' ') {
        return Err(ExportError::InvalidPath(format!(
            "{:?} must not end with a dot or space",
            name
        )));
    }
    let stem = name.split('.').next().unwrap_or(name).trim();
    if RESERVED_NAMES.iter().any(|r| r.eq_ignore_ascii_case(stem)) {
        return Err(ExportError::InvalidPath(format!("{:?} is a reserved name", name)));
    }
    Ok(())
}

/// Check the file name component of an export target.
pub fn validate_path(path: &Path) -> ExportResult<()> {
    let name = path
        .file_name()
        .ok_or_else(|| ExportError::InvalidPath("file name is empty".to_string()))?;
    let name = name
        .to_str()
        .ok_or_else(|| ExportError::InvalidPath(format!("{} is not valid UTF-8", path.display())))?;
    validate_file_name(name)
}

/// Whether the export target already exists (for an overwrite prompt).
pub fn path_exists(path: &Path) -> bool {
    path.exists()
}

/// Encode a frame as an 8-bit RGBA PNG.
pub fn encode_png(frame: &RgbaFrame) -> ExportResult<Vec<u8>> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, frame.width, frame.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        writer
            .write_image_data(&frame.rgba_data)
            .map_err(|e| ExportError::Encode(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| ExportError::Encode(e.to_string()))?;
    }
    Ok(png_data)
}

/// Releases the in-progress flag when the export ends, however it ends.
struct ExportGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Writes the annotated sketch to PNG files.
///
/// Exports always use the canonical view (base zoom, no pan) so saved
/// images are comparable, and never touch the canvas. Overlapping
/// requests are rejected with [`ExportError::Busy`].
#[derive(Debug, Default)]
pub struct Exporter {
    in_progress: AtomicBool,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an export is currently running.
    pub fn is_busy(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    fn begin(&self) -> ExportResult<ExportGuard<'_>> {
        self.in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ExportError::Busy)?;
        Ok(ExportGuard {
            flag: &self.in_progress,
        })
    }

    /// Render `canvas` and write it to `path` as PNG, replacing any file there.
    pub fn export<R: Renderer>(
        &self,
        renderer: &mut R,
        canvas: &AnnotationCanvas,
        path: &Path,
    ) -> ExportResult<()> {
        validate_path(path)?;
        let _guard = self.begin().inspect_err(|_| {
            log::warn!("Rejected export to {}: another export is running", path.display());
        })?;

        let frame = renderer.render(&RenderContext::for_export(canvas))?;
        let png_data = encode_png(&frame)?;
        fs::write(path, &png_data).map_err(|source| {
            log::error!("Failed to write PNG {}: {}", path.display(), source);
            ExportError::FileWrite {
                path: path.to_path_buf(),
                source,
            }
        })?;

        log::info!(
            "Exported PNG to {} ({}x{}, {} strokes)",
            path.display(),
            frame.width,
            frame.height,
            canvas.strokes().len()
        );
        Ok(())
    }
}
