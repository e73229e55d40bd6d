//! Error types shared by the NWM fetch crates.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for archive reads.
pub type SourceResult<T> = Result<T, SourceError>;

/// Whole-file failure while reading an archive file.
///
/// Any of these means no value could be read from the file at all; a failure
/// on a single position is reported through [`crate::PositionRead`] instead.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("File does not exist, verify path and mount point: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Error opening archive file {}: {reason}", path.display())]
    OpenFailed { path: PathBuf, reason: String },

    #[error("Variable '{name}' not found in {}", path.display())]
    MissingVariable { name: String, path: PathBuf },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("Invalid time format: '{0}' (expected YYYY-MM-DD-HH)")]
    InvalidFormat(String),

    #[error("Hour out of range in '{0}'")]
    HourOutOfRange(String),
}
