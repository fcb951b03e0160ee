//! Headless display: a [`Canvas`] behind the [`Renderer`] interface.

use super::canvas::Canvas;
use super::renderer::{PresentOutcome, Renderer};
use crate::board::Point;
use log::{debug, info};
use signal_hook::consts::signal::{SIGINT, SIGTERM, SIGUSR1};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Quit and clear requests delivered to a display from elsewhere.
#[derive(Debug, Clone, Default)]
pub struct DisplaySignals {
    quit: Arc<AtomicBool>,
    clear: Arc<AtomicBool>,
}

impl DisplaySignals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes SIGINT/SIGTERM to quit and SIGUSR1 to clear.
    pub fn register_os_signals(&self) -> io::Result<()> {
        signal_hook::flag::register(SIGINT, Arc::clone(&self.quit))?;
        signal_hook::flag::register(SIGTERM, Arc::clone(&self.quit))?;
        signal_hook::flag::register(SIGUSR1, Arc::clone(&self.clear))?;
        Ok(())
    }

    pub fn request_quit(&self) {
        self.quit.store(true, Ordering::SeqCst);
    }

    pub fn request_clear(&self) {
        self.clear.store(true, Ordering::SeqCst);
    }

    pub fn quit_requested(&self) -> bool {
        self.quit.load(Ordering::SeqCst)
    }

    fn take_clear(&self) -> bool {
        self.clear.swap(false, Ordering::SeqCst)
    }
}

/// Renders into an off-screen canvas. `present` only services signals.
pub struct HeadlessDisplay {
    canvas: Canvas,
    signals: DisplaySignals,
    frames: u64,
}

impl HeadlessDisplay {
    pub fn new(canvas: Canvas, signals: DisplaySignals) -> Self {
        Self {
            canvas,
            signals,
            frames: 0,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn signals(&self) -> &DisplaySignals {
        &self.signals
    }

    /// Number of frames presented so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }
}

impl Renderer for HeadlessDisplay {
    fn draw_segment(&mut self, from: Point, to: Point) {
        self.canvas.draw_segment(from, to);
    }

    fn present(&mut self) -> PresentOutcome {
        self.frames += 1;
        if self.signals.quit_requested() {
            info!("Quit requested after {} frames", self.frames);
            return PresentOutcome::Quit;
        }
        if self.signals.take_clear() {
            debug!("Clearing canvas");
            self.canvas.clear();
        }
        PresentOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::StrokeStyle;

    fn display() -> HeadlessDisplay {
        HeadlessDisplay::new(
            Canvas::new(16, 16, 255, StrokeStyle::default()),
            DisplaySignals::new(),
        )
    }

    #[test]
    fn present_continues_by_default() {
        let mut display = display();
        assert_eq!(display.present(), PresentOutcome::Continue);
        assert_eq!(display.frames(), 1);
    }

    #[test]
    fn clear_request_is_consumed_once() {
        let mut display = display();
        display.draw_segment(Point::new(1, 1), Point::new(8, 8));
        display.signals().request_clear();
        assert_eq!(display.present(), PresentOutcome::Continue);
        assert_eq!(display.canvas().inked_pixels(), 0);

        display.draw_segment(Point::new(1, 1), Point::new(8, 8));
        display.present();
        assert!(display.canvas().inked_pixels() > 0);
    }

    #[test]
    fn quit_request_stops_presenting() {
        let mut display = display();
        display.signals().clone().request_quit();
        assert!(display.present().should_quit());
    }

    #[test]
    fn tracker_accepts_coordinates_far_outside_canvas() {
        use crate::board::{BoardState, StrokeTracker};
        use std::sync::Arc;

        let mut tracker = StrokeTracker::new(Arc::new(BoardState::new()), display());
        tracker.process_event(-2_000_000_000, 8, true);
        tracker.process_event(2_000_000_000, 8, true);
        tracker.process_event(2_000_000_000, 8, false);

        let canvas = tracker.renderer().canvas();
        assert_eq!(canvas.pixel(0, 8), Some(0));
        assert_eq!(canvas.pixel(15, 8), Some(0));
        assert!(!tracker.is_touching());
    }
}
