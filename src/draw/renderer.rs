//! The two primitives the engine needs from a rendering surface.

use crate::board::Point;

/// Result of presenting a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentOutcome {
    /// Keep going.
    Continue,
    /// The user (or a signal) asked to stop.
    Quit,
}

impl PresentOutcome {
    pub fn should_quit(self) -> bool {
        self == PresentOutcome::Quit
    }
}

/// Rendering surface used by the stroke tracker and the player.
///
/// Window management, pixel formats and clipping are the implementor's
/// business; the engine only ever issues these two calls.
pub trait Renderer {
    /// Draws a straight segment with the surface's stroke style.
    fn draw_segment(&mut self, from: Point, to: Point);

    /// Flushes the current canvas and reports whether to continue.
    ///
    /// Clear requests are handled here as well and always yield
    /// [`PresentOutcome::Continue`].
    fn present(&mut self) -> PresentOutcome;
}

impl<R: Renderer + ?Sized> Renderer for &mut R {
    fn draw_segment(&mut self, from: Point, to: Point) {
        (**self).draw_segment(from, to);
    }

    fn present(&mut self) -> PresentOutcome {
        (**self).present()
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn draw_segment(&mut self, from: Point, to: Point) {
        (**self).draw_segment(from, to);
    }

    fn present(&mut self) -> PresentOutcome {
        (**self).present()
    }
}
