use std::path::PathBuf;

use crate::capture::types::SampleSequence;
use crate::storage::{self, StorageError};

/// Abstraction over where a finished recording is persisted.
///
/// The recorder only calls this with a non-empty, normalized sequence.
pub trait SampleSink: Send {
    fn persist(&mut self, sequence: &SampleSequence) -> Result<(), StorageError>;
}

/// Sink writing a sample table to a file.
#[derive(Debug, Clone)]
pub struct TableSink {
    path: PathBuf,
}

impl TableSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SampleSink for TableSink {
    fn persist(&mut self, sequence: &SampleSequence) -> Result<(), StorageError> {
        storage::save_table(sequence, &self.path)
    }
}
