//! Ink strokes in normalized image space.

use crate::coords::Normalizer;
use kurbo::{Point, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stroke.
pub type StrokeId = Uuid;

/// Serializable stroke color (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokeColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl StrokeColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn red() -> Self {
        Self::new(255, 0, 0, 255)
    }
}

impl From<Color> for StrokeColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<StrokeColor> for Color {
    fn from(color: StrokeColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// One continuous pointer drag.
///
/// Points are normalized against the background rectangle. Color and width
/// are fixed when the stroke is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    id: StrokeId,
    points: Vec<Point>,
    color: StrokeColor,
    width: f64,
}

impl Stroke {
    /// Start a stroke at a normalized point.
    pub fn new(start: Point, color: StrokeColor, width: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: vec![start],
            color,
            width,
        }
    }

    pub fn id(&self) -> StrokeId {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn color(&self) -> StrokeColor {
        self.color
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a normalized point. Repeats of the last point are dropped.
    pub(crate) fn push_point(&mut self, point: Point) -> bool {
        if self.points.last() == Some(&point) {
            return false;
        }
        self.points.push(point);
        true
    }

    /// Points mapped into screen space through `normalizer`.
    pub fn screen_points<'a>(
        &'a self,
        normalizer: &'a Normalizer,
    ) -> impl Iterator<Item = Point> + 'a {
        self.points.iter().map(move |p| normalizer.denormalize(*p))
    }

    /// Whether any part of the stroke lies within `radius` screen units of `screen`.
    pub fn hit_test(&self, normalizer: &Normalizer, screen: Point, radius: f64) -> bool {
        let mut points = self.screen_points(normalizer);
        let Some(mut previous) = points.next() else {
            return false;
        };

        if self.points.len() == 1 {
            return previous.distance(screen) <= radius;
        }

        for current in points {
            if distance_to_segment(screen, previous, current) <= radius {
                return true;
            }
            previous = current;
        }
        false
    }
}

/// Distance from `point` to the segment `start..end`.
fn distance_to_segment(point: Point, start: Point, end: Point) -> f64 {
    let segment: Vec2 = end - start;
    let len_sq = segment.hypot2();
    if len_sq < f64::EPSILON {
        return point.distance(start);
    }

    let t = ((point - start).dot(segment) / len_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}
