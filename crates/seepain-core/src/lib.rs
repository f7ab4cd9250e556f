//! SeePain Core Library
//!
//! Platform-agnostic state for the SeePain pain-annotation canvas: strokes
//! in image-normalized coordinates, undo history, the pan/zoom view
//! transform and the drawing tools.

pub mod camera;
pub mod canvas;
pub mod config;
pub mod coords;
pub mod input;
pub mod store;
pub mod stroke;
pub mod tools;

pub use camera::Camera;
pub use canvas::AnnotationCanvas;
pub use config::{CanvasConfig, ConfigError, ConfigResult};
pub use coords::{Normalizer, fit_rect};
pub use input::PointerEvent;
pub use store::StrokeStore;
pub use stroke::{Stroke, StrokeColor, StrokeId};
pub use tools::{Level, ToolMode, ToolState};
