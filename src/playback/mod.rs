//! Replaying recorded sample sequences.

mod player;

pub use player::{PlaybackError, PlaybackReport, PlaybackSource, Player};
