//! Conversion between screen positions and image-normalized coordinates.
//!
//! Strokes are stored relative to the background image's rectangle, so a
//! point keeps its place on the body sketch no matter how the image is
//! panned or zoomed. Every render pass builds a fresh [`Normalizer`] from the
//! current rectangle.

use kurbo::{Point, Rect, Size};

/// Fit an image of `image_size` into `viewport`, preserving aspect ratio.
///
/// The result is centered in the viewport. Returns `None` while either size
/// is degenerate (e.g. before the first layout pass).
pub fn fit_rect(image_size: Size, viewport: Size) -> Option<Rect> {
    if !is_usable(image_size) || !is_usable(viewport) {
        return None;
    }

    let scale = (viewport.width / image_size.width).min(viewport.height / image_size.height);
    let fitted = Size::new(image_size.width * scale, image_size.height * scale);
    let origin = Point::new(
        (viewport.width - fitted.width) / 2.0,
        (viewport.height - fitted.height) / 2.0,
    );
    Some(Rect::from_origin_size(origin, fitted))
}

fn is_usable(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

/// Maps between screen space and normalized image space for one rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalizer {
    rect: Rect,
}

impl Normalizer {
    /// Create a normalizer for the background's current screen rectangle.
    ///
    /// Returns `None` for a zero-sized rectangle so callers can treat
    /// requests made before layout as no-ops.
    pub fn new(rect: Rect) -> Option<Self> {
        if !is_usable(rect.size()) {
            return None;
        }
        Some(Self { rect })
    }

    /// The screen rectangle this normalizer maps against.
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Screen position to normalized image coordinates.
    pub fn normalize(&self, screen: Point) -> Point {
        Point::new(
            (screen.x - self.rect.x0) / self.rect.width(),
            (screen.y - self.rect.y0) / self.rect.height(),
        )
    }

    /// Like [`normalize`](Self::normalize), but pinned to the image edge.
    pub fn normalize_clamped(&self, screen: Point) -> Point {
        let p = self.normalize(screen);
        Point::new(p.x.clamp(0.0, 1.0), p.y.clamp(0.0, 1.0))
    }

    /// Normalized image coordinates back to a screen position.
    pub fn denormalize(&self, normalized: Point) -> Point {
        Point::new(
            self.rect.x0 + normalized.x * self.rect.width(),
            self.rect.y0 + normalized.y * self.rect.height(),
        )
    }

    /// Whether a screen position lies on the image (edges inclusive).
    pub fn contains(&self, screen: Point) -> bool {
        screen.x >= self.rect.x0
            && screen.x <= self.rect.x1
            && screen.y >= self.rect.y0
            && screen.y <= self.rect.y1
    }

    /// Scale factor from normalized units to screen pixels on each axis.
    pub fn scale(&self) -> Size {
        self.rect.size()
    }
}
