//! SeePain Render Library
//!
//! Renderer abstraction, background image loading and PNG export.
//! The default implementation rasterizes on the CPU with tiny-skia.

mod background;
mod export;
mod renderer;
mod skia_impl;

pub use background::BackgroundImage;
pub use export::{
    ExportError, ExportResult, Exporter, encode_png, path_exists, validate_file_name,
    validate_path,
};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError, RgbaFrame};
pub use skia_impl::SkiaRenderer;
