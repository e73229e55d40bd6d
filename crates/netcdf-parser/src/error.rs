//! Error types for NetCDF reading.

use std::path::PathBuf;

use nwm_common::SourceError;
use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF reading.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// The path does not point at a regular file
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The netcdf library refused to open the file
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: netcdf::Error,
    },

    /// Missing required variable
    #[error("missing variable '{name}' in {}", path.display())]
    MissingVariable { name: String, path: PathBuf },
}

impl From<NetCdfError> for SourceError {
    fn from(err: NetCdfError) -> Self {
        match err {
            NetCdfError::NotFound { path } => SourceError::FileNotFound { path },
            NetCdfError::Open { path, source } => SourceError::OpenFailed {
                path,
                reason: source.to_string(),
            },
            NetCdfError::MissingVariable { name, path } => {
                SourceError::MissingVariable { name, path }
            }
        }
    }
}
