//! Native NetCDF reading using the netcdf library.
//!
//! Each call opens the file, looks up the streamflow variable and reads the
//! requested positions one at a time. A position that fails to decode is
//! reported as [`PositionRead::missing`] so the rest of the file is still
//! usable; only a missing file, an unopenable file or a missing variable
//! fails the whole read.

use std::path::{Path, PathBuf};
use std::sync::Once;

use nwm_common::{PositionRead, SourceResult, StreamflowSource};
use tracing::debug;

use crate::error::{NetCdfError, NetCdfResult};

/// Name of the channel streamflow variable in NWM output files.
pub const STREAMFLOW_VARIABLE: &str = "streamflow";

/// Silence HDF5's automatic error printing to stderr.
///
/// The HDF5 C library prints verbose error messages to stderr even when errors
/// are handled gracefully by the Rust code (e.g., a truncated file in the
/// mounted archive). This creates confusing log spam like:
///
/// ```text
/// HDF5-DIAG: Error detected in HDF5 (1.10.8) thread 3:
///   #000: ../../../src/H5F.c line 620 in H5Fopen(): unable to open file
/// ```
///
/// This function disables that output by calling H5Eset_auto2 with null handlers.
/// It only needs to be called once per process, but is safe to call multiple times.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// [`StreamflowSource`] reading NWM files below a mounted archive root.
#[derive(Debug, Clone)]
pub struct NetcdfStreamflowSource {
    root: PathBuf,
    variable: String,
}

impl NetcdfStreamflowSource {
    /// Create a source that resolves paths against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            variable: STREAMFLOW_VARIABLE.to_string(),
        }
    }

    /// Read a different variable than `streamflow`.
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = variable.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read `positions` from the file at `path` (relative to the root).
    pub fn read(&self, path: &str, positions: &[u64]) -> NetCdfResult<Vec<PositionRead>> {
        silence_hdf5_errors();

        let full_path = self.root.join(path);
        let file = open_file(&full_path)?;

        let var = file
            .variable(&self.variable)
            .ok_or_else(|| NetCdfError::MissingVariable {
                name: self.variable.clone(),
                path: full_path.clone(),
            })?;

        Ok(positions
            .iter()
            .map(|&position| read_position(&var, position, &full_path))
            .collect())
    }
}

impl StreamflowSource for NetcdfStreamflowSource {
    fn read_positions(&self, path: &str, positions: &[u64]) -> SourceResult<Vec<PositionRead>> {
        Ok(self.read(path, positions)?)
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Open a NetCDF file, returning [`NetCdfError::NotFound`] if the path is not
/// a regular file.
fn open_file(path: &Path) -> NetCdfResult<netcdf::File> {
    if !path.is_file() {
        return Err(NetCdfError::NotFound {
            path: path.to_path_buf(),
        });
    }
    netcdf::open(path).map_err(|source| NetCdfError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Read one value along the feature dimension.
fn read_position(var: &netcdf::Variable, position: u64, path: &Path) -> PositionRead {
    let Ok(index) = usize::try_from(position) else {
        return PositionRead::missing();
    };

    match var.get_value::<f64, _>(index) {
        Ok(value) => PositionRead::valid(value),
        Err(e) => {
            debug!(
                path = %path.display(),
                position = position,
                error = %e,
                "Failed to read position, using sentinel"
            );
            PositionRead::missing()
        }
    }
}
