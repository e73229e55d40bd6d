//! Narrow read interface over the streamflow archive.
//!
//! The fetch pipeline never decodes files itself. It hands a path and a list
//! of feature positions to a [`StreamflowSource`] and gets back one
//! [`PositionRead`] per position, in the same order.

use crate::error::SourceResult;

/// Factor between archive-native integers and physical units (m³/s).
pub const NATIVE_SCALE: f64 = 100.0;

/// Raw value reported for a position that could not be read.
///
/// Equals `-9999` in physical units once divided by [`NATIVE_SCALE`].
pub const MISSING_RAW_VALUE: f64 = -9999.0 * NATIVE_SCALE;

/// A single value read from an archive file, in native scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionRead {
    pub value: f64,
    /// `false` when the position failed to decode and `value` is the sentinel.
    pub ok: bool,
}

impl PositionRead {
    pub fn valid(value: f64) -> Self {
        Self { value, ok: true }
    }

    /// Sentinel read for a position that failed to decode.
    pub fn missing() -> Self {
        Self {
            value: MISSING_RAW_VALUE,
            ok: false,
        }
    }

    /// Value converted to physical units.
    pub fn scaled(&self) -> f64 {
        self.value / NATIVE_SCALE
    }
}

/// Reads streamflow values at feature positions from one archive file.
///
/// `path` is relative to the archive root the implementation was built with.
/// Implementations must return exactly `positions.len()` reads on success.
pub trait StreamflowSource: Send + Sync {
    fn read_positions(&self, path: &str, positions: &[u64]) -> SourceResult<Vec<PositionRead>>;
}

impl<S: StreamflowSource + ?Sized> StreamflowSource for std::sync::Arc<S> {
    fn read_positions(&self, path: &str, positions: &[u64]) -> SourceResult<Vec<PositionRead>> {
        (**self).read_positions(path, positions)
    }
}
