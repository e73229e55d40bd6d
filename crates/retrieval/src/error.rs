//! Error types for the retrieval crate.
//!
//! Everything here is fatal for a run. Per-file and per-position failures
//! never surface as errors; they are folded into the results as data (see
//! [`crate::record::FileOutcome`]).

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// The requested hour falls outside every archive's availability window.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EraError {
    #[error("Forecast unavailable prior to {first}, requested {requested}")]
    OutOfRange {
        requested: DateTime<Utc>,
        first: DateTime<Utc>,
    },

    #[error("Forecast not yet available for {requested}")]
    NotYetAvailable { requested: DateTime<Utc> },
}

/// An archive path whose text does not follow the NWM naming conventions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed archive path '{path}': {reason}")]
pub struct PathParseError {
    pub path: String,
    pub reason: String,
}

impl PathParseError {
    pub(crate) fn new(path: &str, reason: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failure loading the comid ↔ position index table.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read index table {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed index table row {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// The worker pool stopped before every submitted path produced a result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Worker pool exited after {received} of {expected} results")]
    Incomplete { expected: usize, received: usize },

    #[error("Worker count must be at least 1")]
    NoWorkers,
}

/// Fatal errors that abort a fetch before or during dispatch.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Comid {0} is not in the netcdf file")]
    UnknownComid(i64),

    #[error("No data available for this period: {0}")]
    Era(#[from] EraError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;
