//! File names for new recordings.

use chrono::Local;
use std::path::{Path, PathBuf};

/// Extension used for sample tables.
pub const TABLE_EXTENSION: &str = "csv";

/// Generate a file name from a chrono format template and the current time.
///
/// # Arguments
/// * `template` - Template string with chrono format specifiers
///
/// # Returns
/// File name with the table extension appended
pub fn generate_filename(template: &str) -> String {
    let now = Local::now();
    format!("{}.{}", now.format(template), TABLE_EXTENSION)
}

/// Path of take `index` (zero-based) in a sequence of recordings.
///
/// Takes are numbered from 1 in the file name: `<prefix>_001.csv`, ...
pub fn take_path(directory: &Path, prefix: &str, index: usize) -> PathBuf {
    directory.join(format!("{}_{:03}.{}", prefix, index + 1, TABLE_EXTENSION))
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
