//! Shared pointer/touch snapshot.

use std::sync::{PoisonError, RwLock};

/// A canvas coordinate in pixels.
///
/// Coordinates are not clipped: values outside the canvas are valid and are
/// left for the renderer to handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Immutable view of the board at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardSnapshot {
    /// Last observed pointer position, `None` until the first input event.
    pub position: Option<Point>,
    /// Whether the pen is currently touching the board.
    pub touching: bool,
}

/// Shared board state with single-writer / many-reader access.
///
/// Readers never see a half-written update: the whole snapshot is swapped
/// under the lock. The contents are plain values, so a poisoned lock is
/// recovered rather than propagated.
#[derive(Debug, Default)]
pub struct BoardState {
    inner: RwLock<BoardSnapshot>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current state.
    pub fn snapshot(&self) -> BoardSnapshot {
        *self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn publish(&self, snapshot: BoardSnapshot) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    /// Forgets position and touch state, as at the start of a new session.
    pub fn reset(&self) {
        self.publish(BoardSnapshot::default());
    }
}
