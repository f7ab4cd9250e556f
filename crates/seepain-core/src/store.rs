//! Stroke store with undo/redo history.

use crate::stroke::{Stroke, StrokeId};
use kurbo::Point;

/// Ordered strokes plus the stack of strokes removed from view.
///
/// Insertion order is draw order. A stroke lives in exactly one of the
/// active sequence, the undo stack or the in-progress slot. Redo pops the
/// undo stack, and starting a new stroke empties it.
#[derive(Debug, Clone, Default)]
pub struct StrokeStore {
    /// Committed strokes, back to front.
    strokes: Vec<Stroke>,
    /// Removed strokes, most recent last.
    undo_stack: Vec<Stroke>,
    /// Stroke currently being drawn.
    in_progress: Option<Stroke>,
}

impl StrokeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start drawing a new stroke, discarding any redo history.
    ///
    /// A stroke still in progress is committed first.
    pub fn begin_stroke(&mut self, stroke: Stroke) {
        self.finish_stroke();
        if !self.undo_stack.is_empty() {
            log::debug!("Discarding {} undone strokes", self.undo_stack.len());
            self.undo_stack.clear();
        }
        self.in_progress = Some(stroke);
    }

    /// Append a point to the stroke in progress.
    /// Returns false when no stroke is being drawn or the point is a repeat.
    pub fn extend_stroke(&mut self, point: Point) -> bool {
        match &mut self.in_progress {
            Some(stroke) => stroke.push_point(point),
            None => false,
        }
    }

    /// Commit the stroke in progress to the active sequence.
    pub fn finish_stroke(&mut self) -> Option<StrokeId> {
        let stroke = self.in_progress.take()?;
        let id = stroke.id();
        log::debug!("Committed stroke {} with {} points", id, stroke.len());
        self.strokes.push(stroke);
        Some(id)
    }

    /// Stroke currently being drawn, if any.
    pub fn in_progress(&self) -> Option<&Stroke> {
        self.in_progress.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.in_progress.is_some()
    }

    /// Move the newest stroke onto the undo stack.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.strokes.pop() {
            Some(stroke) => {
                self.undo_stack.push(stroke);
                true
            }
            None => false,
        }
    }

    /// Restore the most recently removed stroke as the newest one.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(stroke) => {
                self.strokes.push(stroke);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.strokes.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Remove every committed stroke matching `predicate`.
    ///
    /// Removed strokes go onto the undo stack topmost first, so repeated
    /// redo brings them back in their original relative order. Returns the
    /// number removed.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&Stroke) -> bool) -> usize {
        let mut kept = Vec::with_capacity(self.strokes.len());
        let mut removed = Vec::new();
        for stroke in self.strokes.drain(..) {
            if predicate(&stroke) {
                removed.push(stroke);
            } else {
                kept.push(stroke);
            }
        }
        self.strokes = kept;
        let count = removed.len();
        self.undo_stack.extend(removed.into_iter().rev());
        count
    }

    /// Discard every stroke and both histories.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.undo_stack.clear();
        self.in_progress = None;
    }

    /// Committed strokes in draw order.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Removed strokes, most recent last.
    pub fn undo_stack(&self) -> &[Stroke] {
        &self.undo_stack
    }

    /// Everything that should be drawn, back to front.
    pub fn render_order(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().chain(self.in_progress.iter())
    }

    /// Number of committed strokes.
    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }
}
