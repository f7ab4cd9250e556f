//! Renderer trait abstraction.

use peniko::Color;
use seepain_core::{AnnotationCanvas, Camera};
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Nothing to render: viewport is {width}x{height}")]
    EmptyViewport { width: f64, height: f64 },
    #[error("Invalid image: {0}")]
    InvalidImage(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// A rendered frame: straight (non-premultiplied) RGBA pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaFrame {
    /// RGBA pixel data (4 bytes per pixel, row-major).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl RgbaFrame {
    /// RGBA value of one pixel, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba_data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Context for a single render pass.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a AnnotationCanvas,
    /// Color behind the background image.
    pub background_color: Color,
    /// View to render with instead of the canvas's own camera.
    pub camera_override: Option<Camera>,
    /// Whether to draw the eraser indicator while the eraser is held.
    pub show_eraser_indicator: bool,
    /// Eraser indicator color.
    pub eraser_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Context for the live, on-screen surface.
    pub fn new(canvas: &'a AnnotationCanvas) -> Self {
        Self {
            canvas,
            background_color: Color::from_rgba8(255, 255, 255, 255),
            camera_override: None,
            show_eraser_indicator: true,
            eraser_color: Color::from_rgba8(255, 0, 0, 128),
        }
    }

    /// Context for exporting: canonical view, no eraser indicator.
    pub fn for_export(canvas: &'a AnnotationCanvas) -> Self {
        Self::new(canvas)
            .with_camera(canvas.camera().canonical())
            .with_eraser_indicator(false)
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    /// Render through `camera` instead of the canvas's view.
    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.camera_override = Some(camera);
        self
    }

    /// Toggle the eraser indicator.
    pub fn with_eraser_indicator(mut self, show: bool) -> Self {
        self.show_eraser_indicator = show;
        self
    }

    /// The camera this pass renders through.
    pub fn camera(&self) -> &Camera {
        self.camera_override
            .as_ref()
            .unwrap_or_else(|| self.canvas.camera())
    }
}

/// Trait for rendering backends.
///
/// The output is a pure function of the canvas state and the context, so a
/// backend may be asked to redraw at any time.
pub trait Renderer {
    /// Draw background and strokes into a new frame.
    fn render(&mut self, ctx: &RenderContext) -> RenderResult<RgbaFrame>;

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
