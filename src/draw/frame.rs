//! In-memory log of draw calls.

use super::renderer::{PresentOutcome, Renderer};
use crate::board::Point;

/// One `draw_segment` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// Renderer that remembers every segment instead of rasterising it.
///
/// Useful for comparing a live capture with its replay, and for counting
/// strokes without a display.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Segments in draw order.
    pub segments: Vec<Segment>,
    /// Number of `present` calls seen so far.
    pub presents: usize,
    /// When set, `present` reports quit once it has been called this many times.
    pub quit_after: Option<usize>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes all segments, as a clear request would.
    pub fn clear(&mut self) {
        self.segments.clear();
    }
}

impl Renderer for Frame {
    fn draw_segment(&mut self, from: Point, to: Point) {
        self.segments.push(Segment { from, to });
    }

    fn present(&mut self) -> PresentOutcome {
        self.presents += 1;
        match self.quit_after {
            Some(limit) if self.presents >= limit => PresentOutcome::Quit,
            _ => PresentOutcome::Continue,
        }
    }
}
