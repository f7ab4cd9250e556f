//! SeePain Session
//!
//! UI-facing glue around the annotation canvas: the action vocabulary for
//! sliders and buttons, application configuration, where saved images go,
//! and a [`Session`] that ties canvas, renderer and exporter together.

mod actions;
mod config;
mod save;
mod session;

pub use actions::{ActionOutcome, UiAction};
pub use config::AppConfig;
pub use save::{IMAGE_EXTENSION, SaveLocation, resolve_save_dir};
pub use session::{Session, SessionError, SessionResult};
