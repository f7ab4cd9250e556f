//! Pointer input events delivered by the host UI.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer event in screen coordinates.
///
/// Touch and mouse input both arrive as down/move/up. Pinch or wheel
/// gestures arrive as `Zoom` with a multiplicative factor around a focus.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    Zoom { position: Point, factor: f64 },
}

impl PointerEvent {
    /// Screen position carried by the event.
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position }
            | PointerEvent::Zoom { position, .. } => position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(PointerEvent::Down { position: p }.position(), p);
        assert_eq!(PointerEvent::Zoom { position: p, factor: 2.0 }.position(), p);
    }
}
