//! Tool state: interaction mode, pain color and pencil width.

use crate::stroke::StrokeColor;
use serde::{Deserialize, Serialize};

/// Exclusive interaction mode of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolMode {
    /// Pointer drags create strokes.
    #[default]
    Draw,
    /// Pointer drags move the background; zoom gestures scale it.
    Pan,
    /// Pointer touches remove strokes.
    Erase,
}

impl ToolMode {
    /// Display name for this mode.
    pub fn name(self) -> &'static str {
        match self {
            ToolMode::Draw => "Draw",
            ToolMode::Pan => "Pan",
            ToolMode::Erase => "Erase",
        }
    }

    /// Mode reached by pressing the toggle button for `target`.
    ///
    /// Toggling the active mode returns to drawing; toggling any other
    /// mode switches to it.
    pub fn toggled(self, target: ToolMode) -> ToolMode {
        if self == target {
            ToolMode::Draw
        } else {
            target
        }
    }
}

/// A discrete slider position in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(1);
    pub const MAX: Level = Level(10);

    /// Create a level, rejecting values outside `1..=10`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0).contains(&value).then_some(Self(value))
    }

    /// Level for a raw slider value: truncated, then clamped into range.
    ///
    /// A continuous slider only reaches the top level at its very end.
    pub fn from_slider(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        let whole = value.floor().clamp(f64::from(Self::MIN.0), f64::from(Self::MAX.0));
        Self(whole as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value).ok_or_else(|| format!("level {value} is outside 1..=10"))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

/// Stroke colors for pain intensities 1 (yellow) to 10 (red).
pub const PAIN_PALETTE: [StrokeColor; 10] = [
    StrokeColor::new(255, 255, 0, 255),
    StrokeColor::new(255, 230, 0, 255),
    StrokeColor::new(255, 204, 0, 255),
    StrokeColor::new(255, 179, 0, 255),
    StrokeColor::new(255, 153, 0, 255),
    StrokeColor::new(255, 128, 0, 255),
    StrokeColor::new(255, 102, 0, 255),
    StrokeColor::new(255, 77, 0, 255),
    StrokeColor::new(255, 51, 0, 255),
    StrokeColor::new(255, 0, 0, 255),
];

/// Slider track shades for pencil levels 1 (light gray) to 10 (black).
pub const PENCIL_TRACK_PALETTE: [StrokeColor; 10] = [
    StrokeColor::new(217, 217, 217, 255),
    StrokeColor::new(204, 204, 204, 255),
    StrokeColor::new(179, 179, 179, 255),
    StrokeColor::new(153, 153, 153, 255),
    StrokeColor::new(128, 128, 128, 255),
    StrokeColor::new(102, 102, 102, 255),
    StrokeColor::new(77, 77, 77, 255),
    StrokeColor::new(51, 51, 51, 255),
    StrokeColor::new(26, 26, 26, 255),
    StrokeColor::new(0, 0, 0, 255),
];

/// Stroke color for a pain intensity.
pub fn pain_color(level: Level) -> StrokeColor {
    PAIN_PALETTE[level.index()]
}

/// Stroke width in screen units for a pencil level.
pub fn pencil_width(level: Level) -> f64 {
    f64::from(level.get())
}

/// Slider track color for a pencil level.
pub fn pencil_track_color(level: Level) -> StrokeColor {
    PENCIL_TRACK_PALETTE[level.index()]
}

/// Current mode plus the settings applied to new strokes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolState {
    mode: ToolMode,
    pain_level: Level,
    pencil_level: Level,
}

impl Default for ToolState {
    fn default() -> Self {
        Self::new(Level::MAX, Level(2))
    }
}

impl ToolState {
    pub fn new(pain_level: Level, pencil_level: Level) -> Self {
        Self {
            mode: ToolMode::Draw,
            pain_level,
            pencil_level,
        }
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    /// Switch mode. Returns true if the mode changed.
    pub fn set_mode(&mut self, mode: ToolMode) -> bool {
        if self.mode == mode {
            return false;
        }
        log::debug!("Tool mode {} -> {}", self.mode.name(), mode.name());
        self.mode = mode;
        true
    }

    pub fn pain_level(&self) -> Level {
        self.pain_level
    }

    pub fn pencil_level(&self) -> Level {
        self.pencil_level
    }

    pub fn set_pain_level(&mut self, level: Level) {
        self.pain_level = level;
    }

    pub fn set_pencil_level(&mut self, level: Level) {
        self.pencil_level = level;
    }

    /// Color for the next stroke.
    pub fn stroke_color(&self) -> StrokeColor {
        pain_color(self.pain_level)
    }

    /// Width for the next stroke.
    pub fn stroke_width(&self) -> f64 {
        pencil_width(self.pencil_level)
    }
}
