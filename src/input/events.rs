//! Pointer event types delivered by an input source.

use crate::board::Point;

/// Mouse button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button (the pen)
    Left,
    /// Right mouse button (ignored for drawing)
    Right,
    /// Middle mouse button (ignored for drawing)
    Middle,
}

/// A raw event from a pointer device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Press { button: MouseButton, at: Point },
    Release { button: MouseButton, at: Point },
    Motion { at: Point },
}

impl PointerEvent {
    /// Where the pointer was when the event fired.
    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Press { at, .. }
            | PointerEvent::Release { at, .. }
            | PointerEvent::Motion { at } => at,
        }
    }
}
