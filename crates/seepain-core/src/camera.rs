//! Camera module for pan/zoom of the background image.

use kurbo::{Affine, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom level at which the background exactly fills its fitted rectangle.
pub const BASE_ZOOM: f64 = 1.0;

/// Camera holds the view transform applied to the background image.
///
/// It maps the fitted ("base") layout space to screen space as
/// `screen = offset + zoom * base`. Strokes never see this transform
/// directly; they follow the image rectangle it produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Current translation offset (pan)
    pub offset: Vec2,
    /// Current zoom level
    pub zoom: f64,
    /// Minimum allowed zoom level
    pub min_zoom: f64,
    /// Maximum allowed zoom level
    pub max_zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: BASE_ZOOM,
            min_zoom: 0.5,
            max_zoom: 5.0,
        }
    }
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a camera with custom zoom limits.
    pub fn with_limits(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            zoom: BASE_ZOOM.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
            ..Self::default()
        }
    }

    /// Transform from base layout space to screen space.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Transform from screen space to base layout space.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    /// Convert a screen point to base layout coordinates.
    pub fn screen_to_base(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    /// Convert a base layout point to screen coordinates.
    pub fn base_to_screen(&self, base_point: Point) -> Point {
        self.transform() * base_point
    }

    /// Screen rectangle of a base layout rectangle.
    pub fn map_rect(&self, base: Rect) -> Rect {
        Rect::from_points(
            self.base_to_screen(base.origin()),
            self.base_to_screen(Point::new(base.x1, base.y1)),
        )
    }

    /// Pan the camera by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom the camera, keeping the given screen point fixed.
    /// Returns false if the zoom was already at its limit.
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            return false;
        }
        let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return false;
        }

        let base_point = self.screen_to_base(screen_point);
        self.zoom = new_zoom;

        // Keep base_point under screen_point
        let new_screen = self.base_to_screen(base_point);
        self.offset += screen_point - new_screen;
        true
    }

    /// Reset camera to zero pan at base zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = BASE_ZOOM;
    }

    /// Copy of this camera at zero pan and base zoom.
    ///
    /// Used for exports so saved images share one scale whatever the
    /// user was looking at.
    pub fn canonical(&self) -> Self {
        let mut camera = self.clone();
        camera.reset();
        camera
    }

    /// Whether the camera shows the base layout unchanged.
    pub fn is_canonical(&self) -> bool {
        self.offset == Vec2::ZERO && (self.zoom - BASE_ZOOM).abs() < f64::EPSILON
    }
}
