//! Trajectory capture.
//!
//! This module provides:
//! - [`Sampler`]: fixed-frequency background sampling of the board
//! - [`Recorder`]: start/stop control, timestamp normalization, persistence
//! - [`Clock`] and [`CancellationToken`]: the time and stop primitives both
//!   capture and playback loops are built on

pub mod clock;
pub mod types;

mod dependencies;
mod recorder;
mod sampler;
#[cfg(test)]
mod tests;

pub use clock::{CancellationToken, Clock, SystemClock};
pub use dependencies::{SampleSink, TableSink};
pub use recorder::Recorder;
pub use sampler::Sampler;
pub use types::{RecordingError, RecordingStatus, Sample, SampleSequence};
