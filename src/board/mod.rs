//! Live board state and the stroke state machine.
//!
//! [`BoardState`] is the single piece of shared mutable state in a capture or
//! playback session. Only [`StrokeTracker`] writes to it; the sampler and any
//! renderer read it through [`BoardState::snapshot`].

mod state;
mod tracker;

pub use state::{BoardSnapshot, BoardState, Point};
pub use tracker::{StrokePhase, StrokeTracker};
