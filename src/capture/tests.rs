use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::{
    Clock, Recorder, RecordingError, RecordingStatus, SampleSequence, SampleSink, SystemClock,
};
use crate::board::{BoardState, StrokeTracker};
use crate::draw::Frame;
use crate::storage::{self, StorageError};

#[derive(Clone, Default)]
struct MockSink {
    pub persisted: Arc<Mutex<Vec<SampleSequence>>>,
    pub should_fail: bool,
}

impl SampleSink for MockSink {
    fn persist(&mut self, sequence: &SampleSequence) -> Result<(), StorageError> {
        if self.should_fail {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only",
            )));
        }
        self.persisted.lock().unwrap().push(sequence.clone());
        Ok(())
    }
}

fn recorder() -> (Recorder, Arc<BoardState>) {
    let board = Arc::new(BoardState::new());
    (
        Recorder::with_clock(Arc::clone(&board), Arc::new(SystemClock)),
        board,
    )
}

#[test]
fn stop_without_input_is_empty_and_skips_sink() {
    let (mut recorder, _board) = recorder();
    let sink = MockSink::default();
    recorder.record(100.0, Some(Box::new(sink.clone()))).unwrap();
    thread::sleep(Duration::from_millis(30));

    let sequence = recorder.stop().unwrap();
    assert!(sequence.is_empty());
    assert!(sink.persisted.lock().unwrap().is_empty());
    assert_eq!(recorder.status(), RecordingStatus::Stopped);
}

#[test]
fn recording_is_normalized_and_persisted() {
    let (mut recorder, board) = recorder();
    let mut tracker = StrokeTracker::new(Arc::clone(&board), Frame::new());
    let sink = MockSink::default();

    tracker.process_event(5, 5, false);
    recorder.record(200.0, Some(Box::new(sink.clone()))).unwrap();
    thread::sleep(Duration::from_millis(20));
    tracker.process_event(5, 5, true);
    thread::sleep(Duration::from_millis(20));
    tracker.process_event(10, 5, true);
    thread::sleep(Duration::from_millis(20));

    let sequence = recorder.stop().unwrap();
    assert!(!sequence.is_empty());
    assert_eq!(sequence.first().unwrap().timestamp, 0);
    assert!(sequence.is_ordered());
    assert!(sequence.iter().any(|s| s.touching));

    let persisted = sink.persisted.lock().unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0], sequence);
}

#[test]
fn second_record_is_rejected() {
    let (mut recorder, _board) = recorder();
    recorder.record(50.0, None).unwrap();
    assert!(matches!(
        recorder.record(50.0, None),
        Err(RecordingError::AlreadyRecording)
    ));
    assert!(recorder.is_recording());
    recorder.stop().unwrap();
    assert!(!recorder.is_recording());
}

#[test]
fn double_stop_returns_same_sequence() {
    let (mut recorder, board) = recorder();
    let mut tracker = StrokeTracker::new(board, Frame::new());
    tracker.process_event(1, 2, false);

    recorder.record(100.0, None).unwrap();
    thread::sleep(Duration::from_millis(30));
    let first = recorder.stop().unwrap();
    let second = recorder.stop().unwrap();
    assert_eq!(first, second);
    assert_eq!(recorder.last_sequence(), Some(&first));
}

#[test]
fn stop_before_any_recording_is_noop() {
    let (mut recorder, _board) = recorder();
    assert_eq!(recorder.status(), RecordingStatus::Idle);
    assert!(recorder.stop().unwrap().is_empty());
}

#[test]
fn sink_failure_propagates() {
    let (mut recorder, board) = recorder();
    let mut tracker = StrokeTracker::new(board, Frame::new());
    tracker.process_event(1, 1, false);

    let sink = MockSink {
        should_fail: true,
        ..MockSink::default()
    };
    recorder.record(100.0, Some(Box::new(sink))).unwrap();
    thread::sleep(Duration::from_millis(30));

    match recorder.stop() {
        Err(RecordingError::Storage(StorageError::Io(err))) => {
            assert_eq!(err.kind(), std::io::ErrorKind::PermissionDenied)
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn invalid_frequency_leaves_recorder_idle() {
    let (mut recorder, _board) = recorder();
    assert!(matches!(
        recorder.record(0.0, None),
        Err(RecordingError::InvalidFrequency(_))
    ));
    assert!(!recorder.is_recording());
}

#[test]
fn record_to_writes_table_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("take.csv");
    let (mut recorder, board) = recorder();
    let mut tracker = StrokeTracker::new(board, Frame::new());
    tracker.process_event(7, 8, true);

    recorder.record_to(100.0, &path).unwrap();
    thread::sleep(Duration::from_millis(30));
    let sequence = recorder.stop().unwrap();

    let loaded = storage::load_table(&path).unwrap();
    assert_eq!(loaded, sequence);
    assert_eq!(loaded.first().unwrap().timestamp, 0);
}

/// Clock that fails after a fixed number of reads.
struct FailingClock {
    reads: AtomicU64,
    fail_after: u64,
}

impl Clock for FailingClock {
    fn now_ns(&self) -> u64 {
        let read = self.reads.fetch_add(1, Ordering::SeqCst);
        if read >= self.fail_after {
            panic!("clock source lost");
        }
        SystemClock.now_ns()
    }

    fn sleep_until(&self, deadline_ns: u64) {
        SystemClock.sleep_until(deadline_ns);
    }
}

#[test]
fn sampler_failure_surfaces_on_stop() {
    let board = Arc::new(BoardState::new());
    let clock = Arc::new(FailingClock {
        reads: AtomicU64::new(0),
        fail_after: 5,
    });
    let mut recorder = Recorder::with_clock(Arc::clone(&board), clock);
    let mut tracker = StrokeTracker::new(board, Frame::new());
    tracker.process_event(1, 1, false);

    let sink = MockSink::default();
    recorder.record(200.0, Some(Box::new(sink.clone()))).unwrap();
    thread::sleep(Duration::from_millis(50));

    match recorder.stop() {
        Err(RecordingError::SamplerFailed(message)) => {
            assert!(message.contains("clock source lost"), "message: {message}")
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(!recorder.is_recording());
    assert_ne!(recorder.status(), RecordingStatus::Recording);
    assert!(sink.persisted.lock().unwrap().is_empty());
}
