//! Actions emitted by the controls around the canvas.

use seepain_core::ToolMode;
use std::path::PathBuf;

/// Actions that can be triggered by the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    /// Pain intensity slider moved (1..=10).
    SetPainLevel(f64),
    /// Pencil slider moved (1..=10).
    SetPencilLevel(f64),
    /// Pan/zoom toggle button.
    TogglePan,
    /// Eraser toggle button.
    ToggleEraser,
    /// Switch mode directly.
    SetMode(ToolMode),
    /// Remove every stroke and the undo history.
    Clear,
    Undo,
    Redo,
    ZoomIn,
    ZoomOut,
    /// Back to base zoom and no pan.
    ZoomReset,
    /// Save the annotated image under the patient's pseudonym.
    Save {
        pseudonym: String,
        /// The user already agreed to replace an existing file.
        overwrite: bool,
    },
}

/// What happened in response to a [`UiAction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action was applied.
    Handled,
    /// Nothing to do, e.g. undo with an empty history.
    Ignored,
    /// The image was written to this path.
    Saved(PathBuf),
    /// A file already exists here; ask before sending `overwrite: true`.
    ConfirmOverwrite(PathBuf),
}
