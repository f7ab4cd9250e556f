//! Background image loading.

use crate::renderer::{RenderResult, RendererError};
use kurbo::Size;
use std::path::Path;
use tiny_skia::{ColorU8, Pixmap};

/// The body sketch drawn behind the strokes.
///
/// Decoded once at construction and kept premultiplied for drawing.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    pixmap: Pixmap,
}

impl BackgroundImage {
    /// Decode an encoded image (PNG, JPEG, WebP).
    pub fn from_bytes(bytes: &[u8]) -> RenderResult<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| RendererError::InvalidImage(e.to_string()))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        Self::from_rgba(width, height, image.as_raw())
    }

    /// Load and decode an image file.
    pub fn open(path: &Path) -> RenderResult<Self> {
        let image = image::open(path)
            .map_err(|e| {
                RendererError::InvalidImage(format!("Failed to load {}: {}", path.display(), e))
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();
        log::info!("Loaded background {} ({}x{})", path.display(), width, height);
        Self::from_rgba(width, height, image.as_raw())
    }

    /// Build from straight RGBA pixels.
    pub fn from_rgba(width: u32, height: u32, rgba: &[u8]) -> RenderResult<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(RendererError::InvalidImage(format!(
                "expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                rgba.len()
            )));
        }
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RendererError::InvalidImage(format!("unsupported image size {}x{}", width, height))
        })?;
        for (dst, src) in pixmap.pixels_mut().iter_mut().zip(rgba.chunks_exact(4)) {
            *dst = ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
        }
        Ok(Self { pixmap })
    }

    /// A blank sheet of one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RenderResult<Self> {
        let pixels = rgba.repeat(width as usize * height as usize);
        Self::from_rgba(width, height, &pixels)
    }

    /// Natural size in pixels.
    pub fn size(&self) -> Size {
        Size::new(f64::from(self.pixmap.width()), f64::from(self.pixmap.height()))
    }

    pub(crate) fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}
