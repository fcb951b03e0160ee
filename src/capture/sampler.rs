//! Fixed-frequency board sampler.

use super::clock::{CancellationToken, Clock};
use super::types::{RecordingError, Sample, SampleSequence};
use crate::board::BoardState;
use log::{debug, info, warn};
use std::any::Any;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// Longest single wait, so cancellation is noticed at low frequencies.
const MAX_WAIT_SLICE_NS: u64 = 50_000_000;

/// Background thread that samples [`BoardState`] on a fixed schedule.
///
/// Deadlines are computed from the loop's start time as
/// `t0 + tick * period`, so one slow iteration does not shift every later
/// tick. Ticks missed during an overrun are skipped, not replayed.
pub struct Sampler {
    frequency_hz: f64,
    token: CancellationToken,
    buffer: Arc<Mutex<Vec<Sample>>>,
    handle: Option<JoinHandle<()>>,
}

impl Sampler {
    /// Spawns a sampler at `frequency_hz` with its own cancellation token.
    pub fn start(
        board: Arc<BoardState>,
        clock: Arc<dyn Clock>,
        frequency_hz: f64,
    ) -> Result<Self, RecordingError> {
        Self::spawn(board, clock, frequency_hz, CancellationToken::new())
    }

    /// Spawns a sampler that also stops when `token` is cancelled elsewhere.
    pub fn spawn(
        board: Arc<BoardState>,
        clock: Arc<dyn Clock>,
        frequency_hz: f64,
        token: CancellationToken,
    ) -> Result<Self, RecordingError> {
        if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
            return Err(RecordingError::InvalidFrequency(frequency_hz));
        }

        let period_ns = NANOS_PER_SEC / frequency_hz;
        if period_ns >= u64::MAX as f64 {
            return Err(RecordingError::InvalidFrequency(frequency_hz));
        }
        let buffer = Arc::new(Mutex::new(Vec::new()));

        let handle = {
            let buffer = Arc::clone(&buffer);
            let token = token.clone();
            thread::Builder::new()
                .name("sampler".into())
                .spawn(move || run_schedule(&board, clock.as_ref(), period_ns, &token, &buffer))
                .map_err(RecordingError::Spawn)?
        };

        info!("Sampler started at {:.1} Hz", frequency_hz);
        Ok(Self {
            frequency_hz,
            token,
            buffer,
            handle: Some(handle),
        })
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    /// Whether the sampling thread is still alive.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Copy of the samples gathered so far.
    pub fn snapshot(&self) -> Vec<Sample> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cancels the loop, waits for the thread to exit and returns the samples.
    ///
    /// A panic on the sampling thread is reported as
    /// [`RecordingError::SamplerFailed`].
    pub fn stop(mut self) -> Result<SampleSequence, RecordingError> {
        self.shutdown()?;
        let mut buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        let samples = std::mem::take(&mut *buffer);
        drop(buffer);
        info!("Sampler stopped with {} samples", samples.len());
        Ok(SampleSequence::from(samples))
    }

    fn shutdown(&mut self) -> Result<(), RecordingError> {
        self.token.cancel();
        match self.handle.take() {
            Some(handle) => handle
                .join()
                .map_err(|payload| RecordingError::SamplerFailed(panic_message(payload.as_ref()))),
            None => Ok(()),
        }
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        if let Err(err) = self.shutdown() {
            warn!("Sampler dropped while failing: {}", err);
        }
    }
}

fn run_schedule(
    board: &BoardState,
    clock: &dyn Clock,
    period_ns: f64,
    token: &CancellationToken,
    buffer: &Mutex<Vec<Sample>>,
) {
    let t0 = clock.now_ns();
    let mut tick: u64 = 0;
    let mut overruns: u64 = 0;

    while !token.is_cancelled() {
        let state = board.snapshot();
        if let Some(point) = state.position {
            let sample = Sample::new(point.x, point.y, state.touching, clock.now_ns());
            buffer
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(sample);
        }

        tick += 1;
        let deadline = t0.saturating_add((tick as f64 * period_ns).round() as u64);
        let now = clock.now_ns();
        if deadline > now {
            wait_until(clock, token, now, deadline);
        } else {
            overruns += 1;
        }
    }

    debug!("Sampling loop exited after {} ticks ({} overruns)", tick, overruns);
}

/// Sleeps towards `deadline` in bounded slices, returning early on cancellation.
fn wait_until(clock: &dyn Clock, token: &CancellationToken, mut now: u64, deadline: u64) {
    while now < deadline && !token.is_cancelled() {
        clock.sleep_until(deadline.min(now.saturating_add(MAX_WAIT_SLICE_NS)));
        now = clock.now_ns();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::clock::simulated::SimulatedClock;
    use crate::capture::clock::SystemClock;

    fn wait_for_exit(sampler: &Sampler) {
        while sampler.is_running() {
            thread::yield_now();
        }
    }

    fn touched_board() -> Arc<BoardState> {
        let board = Arc::new(BoardState::new());
        board.publish(crate::board::BoardSnapshot {
            position: Some(crate::board::Point::new(3, 4)),
            touching: true,
        });
        board
    }

    #[test]
    fn hundred_hertz_for_one_simulated_second() {
        let token = CancellationToken::new();
        let clock = Arc::new(SimulatedClock::new().cancel_at(1_000_000_000, token.clone()));
        let sampler = Sampler::spawn(touched_board(), clock, 100.0, token).unwrap();
        wait_for_exit(&sampler);

        let sequence = sampler.stop().unwrap();
        assert!((99..=101).contains(&sequence.len()), "got {}", sequence.len());
        for pair in sequence.as_slice().windows(2) {
            let gap = pair[1].timestamp - pair[0].timestamp;
            assert!(gap > 0);
            assert!((9_000_000..=11_000_000).contains(&gap), "gap {}", gap);
        }
        assert!(sequence.iter().all(|s| s.x == 3 && s.y == 4 && s.touching));
    }

    #[test]
    fn slow_iterations_do_not_accumulate_drift() {
        // Each clock read costs 4 ms of a 10 ms period; deadlines stay anchored.
        let token = CancellationToken::new();
        let clock = Arc::new(
            SimulatedClock::new()
                .with_step(4_000_000)
                .cancel_at(1_000_000_000, token.clone()),
        );
        let sampler = Sampler::spawn(touched_board(), clock, 100.0, token).unwrap();
        wait_for_exit(&sampler);

        let sequence = sampler.stop().unwrap();
        assert!((99..=101).contains(&sequence.len()), "got {}", sequence.len());
    }

    #[test]
    fn undefined_position_is_never_sampled() {
        let token = CancellationToken::new();
        let clock = Arc::new(SimulatedClock::new().cancel_at(100_000_000, token.clone()));
        let board = Arc::new(BoardState::new());
        let sampler = Sampler::spawn(board, clock, 50.0, token).unwrap();
        wait_for_exit(&sampler);
        assert!(sampler.stop().unwrap().is_empty());
    }

    #[test]
    fn rejects_non_positive_frequency() {
        let board = Arc::new(BoardState::new());
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = Sampler::start(Arc::clone(&board), Arc::new(SystemClock), bad)
                .err()
                .unwrap();
            assert!(matches!(err, RecordingError::InvalidFrequency(_)));
        }
    }

    #[test]
    fn rejects_period_beyond_clock_range() {
        let err = Sampler::start(touched_board(), Arc::new(SystemClock), 1e-11)
            .err()
            .unwrap();
        assert!(matches!(err, RecordingError::InvalidFrequency(_)));
    }

    #[test]
    fn low_frequency_sampler_stops_promptly() {
        let sampler = Sampler::start(touched_board(), Arc::new(SystemClock), 0.01).unwrap();
        thread::sleep(std::time::Duration::from_millis(20));
        let started = std::time::Instant::now();
        let sequence = sampler.stop().unwrap();
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        assert_eq!(sequence.len(), 1);
    }

    #[test]
    fn stop_joins_real_thread() {
        let sampler = Sampler::start(touched_board(), Arc::new(SystemClock), 200.0).unwrap();
        thread::sleep(std::time::Duration::from_millis(30));
        assert!(sampler.is_running());
        let sequence = sampler.stop().unwrap();
        assert!(!sequence.is_empty());
        assert!(sequence.is_ordered());
    }

    #[test]
    fn panic_message_extracts_text() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
    }
}
