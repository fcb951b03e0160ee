//! Pointer trajectory capture and replay.
//!
//! A [`StrokeTracker`] turns `(x, y, button_down)` observations into drawn
//! segments and publishes the latest pointer state to a shared
//! [`BoardState`]. A [`Recorder`] samples that state at a fixed frequency on a
//! background thread and persists the result as a table; a [`Player`] feeds a
//! recorded table back through a tracker with the original timing.

pub mod board;
pub mod capture;
pub mod config;
pub mod draw;
pub mod input;
pub mod playback;
pub mod storage;

pub use board::{BoardSnapshot, BoardState, Point, StrokeTracker};
pub use capture::{Recorder, RecordingError, Sample, SampleSequence, Sampler};
pub use config::Config;
pub use draw::{Canvas, HeadlessDisplay, Renderer};
pub use playback::{PlaybackError, PlaybackSource, Player};
