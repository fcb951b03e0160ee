//! Stroke state machine.

use super::state::{BoardSnapshot, BoardState, Point};
use crate::draw::Renderer;
use log::trace;
use std::sync::Arc;

/// Current stroke phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokePhase {
    /// Pen lifted; observations only move the pointer.
    Idle,
    /// Pen down; `anchor` is where the next segment starts.
    Touching { anchor: Point },
}

/// Previous raw observation, kept to detect transitions.
#[derive(Debug, Clone, Copy)]
struct Observation {
    point: Point,
    button_down: bool,
}

/// Converts raw `(x, y, button_down)` observations into strokes.
///
/// Every produced segment is handed to the renderer immediately, and every
/// observation is published to the shared [`BoardState`].
///
/// # Transitions
/// - `Idle -> Touching`: button pressed now and not pressed (or unknown) on
///   the previous observation. The anchor becomes the current point.
/// - `Touching -> Touching`: the point moved while the button stays down. A
///   segment is drawn from the anchor to the point, which becomes the anchor.
/// - `Touching -> Idle`: the button is released. The closing segment from
///   the anchor to the release point is always drawn, whether or not the
///   pointer moved in the same observation.
pub struct StrokeTracker<R> {
    board: Arc<BoardState>,
    renderer: R,
    phase: StrokePhase,
    previous: Option<Observation>,
}

impl<R: Renderer> StrokeTracker<R> {
    pub fn new(board: Arc<BoardState>, renderer: R) -> Self {
        Self {
            board,
            renderer,
            phase: StrokePhase::Idle,
            previous: None,
        }
    }

    /// Feeds one observation through the state machine.
    pub fn process_event(&mut self, x: i32, y: i32, button_down: bool) {
        let point = Point::new(x, y);
        let previous = self.previous.replace(Observation { point, button_down });
        let started_touching = button_down && !previous.is_some_and(|p| p.button_down);
        let moved = previous.is_none_or(|p| p.point != point);

        self.phase = match self.phase {
            _ if started_touching => {
                trace!("stroke started at ({}, {})", x, y);
                StrokePhase::Touching { anchor: point }
            }
            StrokePhase::Touching { anchor } if !button_down => {
                self.renderer.draw_segment(anchor, point);
                trace!("stroke finished at ({}, {})", x, y);
                StrokePhase::Idle
            }
            StrokePhase::Touching { anchor } if moved => {
                self.renderer.draw_segment(anchor, point);
                StrokePhase::Touching { anchor: point }
            }
            phase => phase,
        };

        self.board.publish(BoardSnapshot {
            position: Some(point),
            touching: self.is_touching(),
        });
    }

    /// Snapshot of the board as last published by this tracker.
    pub fn state(&self) -> BoardSnapshot {
        self.board.snapshot()
    }

    pub fn phase(&self) -> StrokePhase {
        self.phase
    }

    pub fn is_touching(&self) -> bool {
        matches!(self.phase, StrokePhase::Touching { .. })
    }

    pub fn board(&self) -> &Arc<BoardState> {
        &self.board
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
