//! Tabular sample files: `x,y,l_button_down,stamp`.

use super::StorageError;
use crate::capture::{Sample, SampleSequence};
use fs2::FileExt;
use log::{debug, info, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Column names, in file order.
pub const HEADER: [&str; 4] = ["x", "y", "l_button_down", "stamp"];

/// Writes `sequence` to `out` as a header row followed by one row per sample.
pub fn write_table<W: Write>(sequence: &SampleSequence, out: W) -> Result<(), StorageError> {
    let mut out = BufWriter::new(out);
    writeln!(out, "{}", HEADER.join(","))?;
    for sample in sequence {
        writeln!(
            out,
            "{},{},{},{}",
            sample.x,
            sample.y,
            u8::from(sample.touching),
            sample.timestamp
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Parses a table, validating the header, every row, and stamp ordering.
pub fn read_table<R: Read>(input: R) -> Result<SampleSequence, StorageError> {
    let mut lines = BufReader::new(input).lines();

    let header = lines.next().ok_or(StorageError::MissingHeader)??;
    let columns: Vec<&str> = header.trim().split(',').map(str::trim).collect();
    if columns != HEADER {
        return Err(StorageError::InvalidHeader(header));
    }

    let mut samples: Vec<Sample> = Vec::new();
    for (offset, line) in lines.enumerate() {
        let line = line?;
        // Line numbers are 1-based and the header is line 1.
        let line_no = offset + 2;
        if line.trim().is_empty() {
            continue;
        }
        let sample = parse_row(&line, line_no)?;
        if let Some(previous) = samples.last() {
            if sample.timestamp < previous.timestamp {
                return Err(StorageError::OutOfOrder {
                    line: line_no,
                    stamp: sample.timestamp,
                    previous: previous.timestamp,
                });
            }
        }
        samples.push(sample);
    }

    Ok(SampleSequence::from(samples))
}

fn parse_row(line: &str, line_no: usize) -> Result<Sample, StorageError> {
    let invalid = |reason: String| StorageError::InvalidRow {
        line: line_no,
        reason,
    };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let [x, y, down, stamp] = fields.as_slice() else {
        return Err(invalid(format!("expected 4 columns, found {}", fields.len())));
    };

    let x = x
        .parse::<i32>()
        .map_err(|e| invalid(format!("x {:?}: {}", x, e)))?;
    let y = y
        .parse::<i32>()
        .map_err(|e| invalid(format!("y {:?}: {}", y, e)))?;
    let touching = parse_flag(down).ok_or_else(|| invalid(format!("l_button_down {:?}", down)))?;
    let timestamp = stamp
        .parse::<u64>()
        .map_err(|e| invalid(format!("stamp {:?}: {}", stamp, e)))?;

    Ok(Sample::new(x, y, touching, timestamp))
}

/// Accepts `0`/`1` as well as the `True`/`False` spellings of older files.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    path.with_file_name(name)
}

/// Saves `sequence` to `path`, creating parent directories.
///
/// The write happens under an exclusive lock on a sibling `.lock` file so
/// that two recorders never interleave rows in the same file.
pub fn save_table(sequence: &SampleSequence, path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let lock_path = lock_path_for(path);
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&lock_path)?;
    FileExt::lock_exclusive(&lock_file)?;

    let result = File::create(path)
        .map_err(StorageError::from)
        .and_then(|file| write_table(sequence, file));

    FileExt::unlock(&lock_file).unwrap_or_else(|err| {
        warn!("failed to unlock {}: {}", lock_path.display(), err)
    });

    result?;
    info!("Saved {} samples to {}", sequence.len(), path.display());
    Ok(())
}

/// Loads a sequence from `path`.
pub fn load_table(path: &Path) -> Result<SampleSequence, StorageError> {
    let file = File::open(path)?;
    let sequence = read_table(file)?;
    debug!("Loaded {} samples from {}", sequence.len(), path.display());
    Ok(sequence)
}
