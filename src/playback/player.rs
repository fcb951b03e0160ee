use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};
use thiserror::Error;

use crate::board::StrokeTracker;
use crate::capture::{CancellationToken, Clock, SampleSequence, SystemClock};
use crate::draw::Renderer;
use crate::storage::{self, StorageError};

/// Errors that can occur before or during playback.
#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("No file path or in-memory sequence specified")]
    NoSource,

    #[error("Both a file path and an in-memory sequence were specified")]
    AmbiguousSource,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Where the samples to replay come from.
#[derive(Debug, Clone)]
pub enum PlaybackSource {
    /// A sample table on disk.
    File(PathBuf),
    /// A sequence already in memory, e.g. straight from a recorder.
    Memory(SampleSequence),
}

impl PlaybackSource {
    /// Builds a source from optional parts; exactly one must be present.
    pub fn from_parts(
        path: Option<PathBuf>,
        sequence: Option<SampleSequence>,
    ) -> Result<Self, PlaybackError> {
        match (path, sequence) {
            (Some(path), None) => Ok(Self::File(path)),
            (None, Some(sequence)) => Ok(Self::Memory(sequence)),
            (None, None) => Err(PlaybackError::NoSource),
            (Some(_), Some(_)) => Err(PlaybackError::AmbiguousSource),
        }
    }

    /// Loads the samples, reading the file if needed.
    pub fn resolve(self) -> Result<SampleSequence, PlaybackError> {
        match self {
            Self::File(path) => Ok(storage::load_table(&path)?),
            Self::Memory(sequence) => Ok(sequence),
        }
    }
}

/// Outcome of one playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Samples fed to the tracker.
    pub applied: usize,
    /// Samples in the source.
    pub total: usize,
    /// Playback ended early on a quit request or cancellation.
    pub cancelled: bool,
}

/// Replays a sample sequence through a [`StrokeTracker`] with the original
/// inter-sample timing.
///
/// Each step presents the renderer, applies one sample, then sleeps for the
/// recorded gap to the next sample minus the time the step itself took. A
/// step that overruns its gap is followed immediately by the next one.
///
/// Only samples `0..len-1` are applied: the last row only provides the
/// timing of the gap before it.
pub struct Player {
    clock: Arc<dyn Clock>,
    token: CancellationToken,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            token: CancellationToken::new(),
        }
    }

    /// Token that stops playback between samples when cancelled. Once
    /// cancelled, every later `play` on this player returns immediately.
    pub fn cancel_token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Resolves `source` and replays it.
    pub fn play<R: Renderer>(
        &mut self,
        tracker: &mut StrokeTracker<R>,
        source: PlaybackSource,
    ) -> Result<PlaybackReport, PlaybackError> {
        let sequence = source.resolve()?;
        Ok(self.play_sequence(tracker, &sequence))
    }

    pub fn play_sequence<R: Renderer>(
        &mut self,
        tracker: &mut StrokeTracker<R>,
        sequence: &SampleSequence,
    ) -> PlaybackReport {
        let mut report = PlaybackReport {
            applied: 0,
            total: sequence.len(),
            cancelled: false,
        };
        info!("Playing {} samples", sequence.len());

        for pair in sequence.as_slice().windows(2) {
            let (current, next) = (pair[0], pair[1]);
            if self.token.is_cancelled() {
                report.cancelled = true;
                break;
            }

            let t_start = self.clock.now_ns();
            if tracker.renderer_mut().present().should_quit() {
                report.cancelled = true;
                break;
            }
            tracker.process_event(current.x, current.y, current.touching);
            report.applied += 1;
            let elapsed = self.clock.now_ns().saturating_sub(t_start);

            let gap = next.timestamp.saturating_sub(current.timestamp);
            if gap > elapsed {
                self.clock.sleep_for(gap - elapsed);
            }
        }

        if report.cancelled {
            info!(
                "Playback cancelled after {} of {} samples",
                report.applied, report.total
            );
        } else {
            debug!("Playback finished ({} samples applied)", report.applied);
        }
        report
    }
}
