//! Persistence of sample sequences.
//!
//! Sequences are stored as plain tables with a `x,y,l_button_down,stamp`
//! header, one row per sample, stamps in nanoseconds from the first sample.

pub mod naming;
pub mod table;

pub use naming::{expand_tilde, generate_filename, take_path};
pub use table::{HEADER, load_table, read_table, save_table, write_table};

use thiserror::Error;

/// Errors raised while reading or writing sample tables.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Sample table is empty (missing header row)")]
    MissingHeader,

    #[error("Unexpected header {0:?}, expected \"x,y,l_button_down,stamp\"")]
    InvalidHeader(String),

    #[error("Invalid row on line {line}: {reason}")]
    InvalidRow { line: usize, reason: String },

    #[error("Stamp {stamp} on line {line} is earlier than previous stamp {previous}")]
    OutOfOrder {
        line: usize,
        stamp: u64,
        previous: u64,
    },
}
