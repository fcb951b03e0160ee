//! Adapts device events to stroke-tracker observations.

use super::events::{MouseButton, PointerEvent};
use crate::board::StrokeTracker;
use crate::draw::Renderer;

/// Keeps the left-button state between events.
///
/// Device callbacks report presses, releases and motion separately; the
/// tracker wants `(x, y, button_down)` on every event. Every event, whichever
/// button it concerns, produces exactly one observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointerInput {
    left_down: bool,
}

impl PointerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn left_down(&self) -> bool {
        self.left_down
    }

    /// Updates the button state from `event` and feeds the tracker.
    pub fn handle<R: Renderer>(&mut self, tracker: &mut StrokeTracker<R>, event: PointerEvent) {
        match event {
            PointerEvent::Press {
                button: MouseButton::Left,
                ..
            } => self.left_down = true,
            PointerEvent::Release {
                button: MouseButton::Left,
                ..
            } => self.left_down = false,
            _ => {}
        }
        let at = event.position();
        tracker.process_event(at.x, at.y, self.left_down);
    }
}
