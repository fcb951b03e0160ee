//! Data types for trajectory capture.

use crate::board::Point;
use crate::storage::StorageError;
use std::ops::Range;
use thiserror::Error;

/// One timestamped observation of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub x: i32,
    pub y: i32,
    /// Pen touching the board at the time of the sample.
    pub touching: bool,
    /// Monotonic time in nanoseconds; zero-based once normalized.
    pub timestamp: u64,
}

impl Sample {
    pub const fn new(x: i32, y: i32, touching: bool, timestamp: u64) -> Self {
        Self {
            x,
            y,
            touching,
            timestamp,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Samples ordered by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleSequence {
    samples: Vec<Sample>,
}

impl SampleSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[Sample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.samples.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Sample> {
        self.samples.get(index)
    }

    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Adds a sample, keeping timestamps non-decreasing. A sample older than
    /// the last one is inserted after every sample with a stamp not above it.
    pub fn push(&mut self, sample: Sample) {
        let index = self
            .samples
            .partition_point(|s| s.timestamp <= sample.timestamp);
        self.samples.insert(index, sample);
    }

    /// Shifts all timestamps so the first sample sits at zero.
    pub fn normalize(&mut self) {
        if let Some(origin) = self.first().map(|s| s.timestamp) {
            for sample in &mut self.samples {
                sample.timestamp -= origin;
            }
        }
    }

    pub fn is_normalized(&self) -> bool {
        self.first().is_none_or(|s| s.timestamp == 0)
    }

    /// Whether timestamps never decrease.
    pub fn is_ordered(&self) -> bool {
        self.samples
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp)
    }

    /// Time from first to last sample, in nanoseconds.
    pub fn duration_ns(&self) -> u64 {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => 0,
        }
    }

    /// Index ranges of maximal runs of touching samples.
    pub fn strokes(&self) -> Vec<Range<usize>> {
        let mut strokes = Vec::new();
        let mut start = None;
        for (index, sample) in self.samples.iter().enumerate() {
            match (start, sample.touching) {
                (None, true) => start = Some(index),
                (Some(begin), false) => {
                    strokes.push(begin..index);
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(begin) = start {
            strokes.push(begin..self.samples.len());
        }
        strokes
    }
}

impl From<Vec<Sample>> for SampleSequence {
    /// Orders samples by timestamp; equal stamps keep their relative order.
    fn from(mut samples: Vec<Sample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }
}

impl FromIterator<Sample> for SampleSequence {
    fn from_iter<T: IntoIterator<Item = Sample>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl IntoIterator for SampleSequence {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

impl<'a> IntoIterator for &'a SampleSequence {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Errors that can occur while recording.
#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("Already recording")]
    AlreadyRecording,

    #[error("Invalid sampling frequency: {0} Hz (must be finite and > 0)")]
    InvalidFrequency(f64),

    #[error("Sampler thread failed: {0}")]
    SamplerFailed(String),

    #[error("Failed to spawn sampler thread: {0}")]
    Spawn(#[source] std::io::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Status of a [`Recorder`](super::Recorder).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingStatus {
    /// Nothing recorded yet.
    Idle,
    /// Sampler running.
    Recording,
    /// Stopped; the last sequence is available.
    Stopped,
}
