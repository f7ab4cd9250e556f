//! Annotation canvas state and pointer handling.

use crate::camera::Camera;
use crate::config::CanvasConfig;
use crate::coords::{Normalizer, fit_rect};
use crate::input::PointerEvent;
use crate::store::StrokeStore;
use crate::stroke::Stroke;
use crate::tools::{Level, ToolMode, ToolState};
use kurbo::{Point, Rect, Size, Vec2};

/// Gesture in progress between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Gesture {
    #[default]
    Idle,
    /// A stroke is being drawn.
    Drawing,
    /// The background is being dragged.
    Panning { last: Point },
    /// The eraser is held down.
    Erasing,
}

/// The complete drawing state behind the SeePain canvas widget.
///
/// Owns the strokes, the view transform and the tool settings. The host UI
/// feeds it pointer events and control changes and reads it back when
/// rendering; nothing here depends on a particular toolkit.
#[derive(Debug, Clone)]
pub struct AnnotationCanvas {
    config: CanvasConfig,
    /// Natural size of the background image.
    image_size: Size,
    /// Widget size in screen units; zero until the first layout.
    viewport: Size,
    camera: Camera,
    tools: ToolState,
    store: StrokeStore,
    gesture: Gesture,
    /// Eraser position while the eraser is held.
    eraser_cursor: Option<Point>,
    /// Bumped on every visible change.
    revision: u64,
}

impl AnnotationCanvas {
    /// Create a canvas for a background image of the given natural size.
    pub fn new(config: CanvasConfig, image_size: Size) -> Self {
        let camera = Camera::with_limits(config.min_zoom, config.max_zoom);
        let tools = ToolState::new(config.default_pain_level, config.default_pencil_level);
        Self {
            config,
            image_size,
            viewport: Size::ZERO,
            camera,
            tools,
            store: StrokeStore::new(),
            gesture: Gesture::Idle,
            eraser_cursor: None,
            revision: 0,
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn image_size(&self) -> Size {
        self.image_size
    }

    /// Set the widget size (called on every layout/size event).
    pub fn set_viewport_size(&mut self, width: f64, height: f64) {
        let size = Size::new(width, height);
        if size != self.viewport {
            self.viewport = size;
            self.touch();
        }
    }

    pub fn viewport_size(&self) -> Size {
        self.viewport
    }

    /// Monotonic counter of visible changes, for skipping unchanged frames.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // --- geometry ---

    /// Background rectangle at base zoom and zero pan.
    pub fn base_rect(&self) -> Option<Rect> {
        fit_rect(self.image_size, self.viewport)
    }

    /// Background rectangle under the current view transform.
    pub fn image_rect(&self) -> Option<Rect> {
        self.image_rect_with(&self.camera)
    }

    /// Background rectangle under an arbitrary camera.
    pub fn image_rect_with(&self, camera: &Camera) -> Option<Rect> {
        self.base_rect().map(|base| camera.map_rect(base))
    }

    /// Normalizer for the current view, or `None` before layout.
    pub fn normalizer(&self) -> Option<Normalizer> {
        self.normalizer_with(&self.camera)
    }

    /// Normalizer for an arbitrary camera, e.g. the canonical export view.
    pub fn normalizer_with(&self, camera: &Camera) -> Option<Normalizer> {
        self.image_rect_with(camera).and_then(Normalizer::new)
    }

    // --- view transform ---

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Move the background by a screen-space delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        if delta != Vec2::ZERO {
            self.camera.pan(delta);
            self.touch();
        }
    }

    /// Scale the background around a screen point.
    pub fn zoom_at(&mut self, focus: Point, factor: f64) -> bool {
        let changed = self.camera.zoom_at(focus, factor);
        if changed {
            self.touch();
        }
        changed
    }

    /// Zoom in one step around the viewport center.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_at(self.viewport_center(), self.config.zoom_step)
    }

    /// Zoom out one step around the viewport center.
    pub fn zoom_out(&mut self) -> bool {
        self.zoom_at(self.viewport_center(), 1.0 / self.config.zoom_step)
    }

    /// Return to zero pan at base zoom.
    pub fn reset_view(&mut self) {
        if !self.camera.is_canonical() {
            self.camera.reset();
            self.touch();
        }
    }

    fn viewport_center(&self) -> Point {
        Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0)
    }

    // --- tool state ---

    pub fn tools(&self) -> &ToolState {
        &self.tools
    }

    pub fn mode(&self) -> ToolMode {
        self.tools.mode()
    }

    /// Switch mode, finishing any gesture that belonged to the old one.
    pub fn set_mode(&mut self, mode: ToolMode) {
        if mode != self.tools.mode() {
            self.finish_gesture();
            self.tools.set_mode(mode);
            self.touch();
        }
    }

    /// The pan/zoom toggle button.
    pub fn toggle_pan(&mut self) -> ToolMode {
        let next = self.mode().toggled(ToolMode::Pan);
        self.set_mode(next);
        next
    }

    /// The eraser toggle button.
    pub fn toggle_eraser(&mut self) -> ToolMode {
        let next = self.mode().toggled(ToolMode::Erase);
        self.set_mode(next);
        next
    }

    /// Apply the pain slider; affects strokes started afterwards.
    pub fn set_pain_level(&mut self, value: f64) -> Level {
        let level = Level::from_slider(value);
        self.tools.set_pain_level(level);
        level
    }

    /// Apply the pencil slider; affects strokes started afterwards.
    pub fn set_pencil_level(&mut self, value: f64) -> Level {
        let level = Level::from_slider(value);
        self.tools.set_pencil_level(level);
        level
    }

    // --- strokes ---

    pub fn store(&self) -> &StrokeStore {
        &self.store
    }

    /// Committed strokes in draw order.
    pub fn strokes(&self) -> &[Stroke] {
        self.store.strokes()
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.store.undo();
        if changed {
            self.touch();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.store.redo();
        if changed {
            self.touch();
        }
        changed
    }

    pub fn can_undo(&self) -> bool {
        self.store.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.store.can_redo()
    }

    /// Discard all strokes and history.
    pub fn clear(&mut self) {
        self.store.clear();
        self.gesture = Gesture::Idle;
        self.eraser_cursor = None;
        self.touch();
    }

    /// Remove every stroke within the eraser radius of a screen point.
    pub fn erase_at(&mut self, screen: Point) -> usize {
        let Some(normalizer) = self.normalizer() else {
            return 0;
        };
        let radius = self.config.eraser_radius;
        let removed = self
            .store
            .remove_where(|stroke| stroke.hit_test(&normalizer, screen, radius));
        if removed > 0 {
            log::debug!("Erased {} strokes at ({:.1}, {:.1})", removed, screen.x, screen.y);
            self.touch();
        }
        removed
    }

    /// Eraser indicator center while the eraser is held.
    pub fn eraser_cursor(&self) -> Option<Point> {
        self.eraser_cursor
    }

    /// Eraser indicator radius in screen units.
    pub fn eraser_indicator_radius(&self) -> f64 {
        self.config.eraser_indicator_diameter / 2.0
    }

    // --- pointer input ---

    /// Dispatch a pointer event. Returns true if visible state changed.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) -> bool {
        let before = self.revision;
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(position),
            PointerEvent::Zoom { position, factor } => {
                if self.mode() == ToolMode::Pan {
                    self.zoom_at(position, factor);
                }
            }
        }
        self.revision != before
    }

    pub fn pointer_down(&mut self, position: Point) {
        if self.gesture != Gesture::Idle {
            return;
        }
        match self.mode() {
            ToolMode::Draw => {
                let Some(normalizer) = self.normalizer() else {
                    return;
                };
                if !normalizer.contains(position) {
                    return;
                }
                let stroke = Stroke::new(
                    normalizer.normalize_clamped(position),
                    self.tools.stroke_color(),
                    self.tools.stroke_width(),
                );
                log::debug!("Begin stroke {}", stroke.id());
                self.store.begin_stroke(stroke);
                self.gesture = Gesture::Drawing;
                self.touch();
            }
            ToolMode::Pan => {
                self.gesture = Gesture::Panning { last: position };
            }
            ToolMode::Erase => {
                self.gesture = Gesture::Erasing;
                self.eraser_cursor = Some(position);
                self.erase_at(position);
                self.touch();
            }
        }
    }

    pub fn pointer_move(&mut self, position: Point) {
        match self.gesture {
            Gesture::Idle => {}
            Gesture::Drawing => self.extend_stroke(position),
            Gesture::Panning { last } => {
                self.pan_by(position - last);
                self.gesture = Gesture::Panning { last: position };
            }
            Gesture::Erasing => {
                self.eraser_cursor = Some(position);
                self.erase_at(position);
                self.touch();
            }
        }
    }

    pub fn pointer_up(&mut self, position: Point) {
        match self.gesture {
            Gesture::Idle => return,
            Gesture::Drawing => self.extend_stroke(position),
            Gesture::Panning { last } => self.pan_by(position - last),
            Gesture::Erasing => {
                self.erase_at(position);
            }
        }
        self.finish_gesture();
    }

    fn extend_stroke(&mut self, position: Point) {
        let Some(normalizer) = self.normalizer() else {
            return;
        };
        if self.store.extend_stroke(normalizer.normalize_clamped(position)) {
            self.touch();
        }
    }

    fn finish_gesture(&mut self) {
        match self.gesture {
            Gesture::Drawing => {
                self.store.finish_stroke();
            }
            Gesture::Erasing => {
                self.eraser_cursor = None;
                self.touch();
            }
            Gesture::Idle | Gesture::Panning { .. } => {}
        }
        self.gesture = Gesture::Idle;
    }
}
