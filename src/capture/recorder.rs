use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};

use crate::board::BoardState;
use crate::capture::{
    clock::{Clock, SystemClock},
    dependencies::{SampleSink, TableSink},
    sampler::Sampler,
    types::{RecordingError, RecordingStatus, SampleSequence},
};

/// Controls one recording at a time over a shared board.
///
/// `record` starts a [`Sampler`]; `stop` joins it, shifts the timestamps so
/// the first sample is at zero and hands the result to the sink, if any.
/// Stopping again just returns the sequence already produced.
pub struct Recorder {
    board: Arc<BoardState>,
    clock: Arc<dyn Clock>,
    sampler: Option<Sampler>,
    sink: Option<Box<dyn SampleSink>>,
    last: Option<SampleSequence>,
}

impl Recorder {
    pub fn new(board: Arc<BoardState>) -> Self {
        Self::with_clock(board, Arc::new(SystemClock))
    }

    /// Create a recorder with a custom time source (useful for testing).
    pub fn with_clock(board: Arc<BoardState>, clock: Arc<dyn Clock>) -> Self {
        Self {
            board,
            clock,
            sampler: None,
            sink: None,
            last: None,
        }
    }

    /// Starts sampling the board at `frequency_hz`.
    ///
    /// # Errors
    /// - [`RecordingError::AlreadyRecording`] if a recording is active
    /// - [`RecordingError::InvalidFrequency`] for a non-positive frequency
    pub fn record(
        &mut self,
        frequency_hz: f64,
        sink: Option<Box<dyn SampleSink>>,
    ) -> Result<(), RecordingError> {
        if self.sampler.is_some() {
            return Err(RecordingError::AlreadyRecording);
        }

        let sampler = Sampler::start(
            Arc::clone(&self.board),
            Arc::clone(&self.clock),
            frequency_hz,
        )?;
        info!("Recording started at {:.1} Hz", sampler.frequency_hz());
        self.sampler = Some(sampler);
        self.sink = sink;
        self.last = None;
        Ok(())
    }

    /// Shorthand for recording into a sample table at `path`.
    pub fn record_to(
        &mut self,
        frequency_hz: f64,
        path: impl Into<PathBuf>,
    ) -> Result<(), RecordingError> {
        self.record(frequency_hz, Some(Box::new(TableSink::new(path))))
    }

    /// Stops the sampler and returns the normalized sequence.
    ///
    /// Nothing is persisted when the sequence is empty. Calling this when no
    /// recording is active returns the previous result (or an empty sequence).
    pub fn stop(&mut self) -> Result<SampleSequence, RecordingError> {
        let Some(sampler) = self.sampler.take() else {
            debug!("stop() without an active recording");
            return Ok(self.last.clone().unwrap_or_default());
        };

        let sink = self.sink.take();
        let mut sequence = sampler.stop()?;
        sequence.normalize();
        self.last = Some(sequence.clone());

        if sequence.is_empty() {
            info!("Recording stopped without any defined position; nothing to save");
            return Ok(sequence);
        }

        if let Some(mut sink) = sink {
            sink.persist(&sequence)?;
        }

        info!(
            "Recording stopped: {} samples over {:.3}s",
            sequence.len(),
            sequence.duration_ns() as f64 / 1e9
        );
        Ok(sequence)
    }

    pub fn is_recording(&self) -> bool {
        self.sampler.is_some()
    }

    pub fn status(&self) -> RecordingStatus {
        match (&self.sampler, &self.last) {
            (Some(_), _) => RecordingStatus::Recording,
            (None, Some(_)) => RecordingStatus::Stopped,
            (None, None) => RecordingStatus::Idle,
        }
    }

    /// The sequence produced by the last completed `stop`.
    pub fn last_sequence(&self) -> Option<&SampleSequence> {
        self.last.as_ref()
    }

    pub fn board(&self) -> &Arc<BoardState> {
        &self.board
    }
}
