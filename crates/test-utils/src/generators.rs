//! In-memory stand-ins for the archive.

use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use nwm_common::{PositionRead, SourceError, SourceResult, StreamflowSource};

use crate::fixtures::{INDEX_HEADER, INDEX_ROWS};

/// A [`StreamflowSource`] backed by a map of path → native values.
///
/// Positions past the end of a file's values decode as the missing sentinel,
/// mirroring a per-position read failure. Every call is logged so tests can
/// check that each path was read exactly once.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<f64>>,
    fallback: Option<Vec<f64>>,
    unreadable: HashSet<String>,
    missing_variable: HashSet<String>,
    reads: Mutex<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `values` for every path not registered otherwise.
    pub fn with_fallback(mut self, values: Vec<f64>) -> Self {
        self.fallback = Some(values);
        self
    }

    pub fn with_file(mut self, path: impl Into<String>, values: Vec<f64>) -> Self {
        self.files.insert(path.into(), values);
        self
    }

    /// Make `path` fail to open, as a corrupted file would.
    pub fn with_corrupt_file(mut self, path: impl Into<String>) -> Self {
        self.unreadable.insert(path.into());
        self
    }

    /// Make `path` open but lack the streamflow variable.
    pub fn with_missing_variable(mut self, path: impl Into<String>) -> Self {
        self.missing_variable.insert(path.into());
        self
    }

    /// Paths read so far, in call order.
    pub fn read_log(&self) -> Vec<String> {
        self.reads.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl StreamflowSource for MemorySource {
    fn read_positions(&self, path: &str, positions: &[u64]) -> SourceResult<Vec<PositionRead>> {
        if let Ok(mut reads) = self.reads.lock() {
            reads.push(path.to_string());
        }

        if self.unreadable.contains(path) {
            return Err(SourceError::OpenFailed {
                path: PathBuf::from(path),
                reason: "NetCDF: Unknown file format".to_string(),
            });
        }
        if self.missing_variable.contains(path) {
            return Err(SourceError::MissingVariable {
                name: "streamflow".to_string(),
                path: PathBuf::from(path),
            });
        }

        let values = self
            .files
            .get(path)
            .or(self.fallback.as_ref())
            .ok_or_else(|| SourceError::FileNotFound {
                path: PathBuf::from(path),
            })?;

        Ok(positions
            .iter()
            .map(|&p| {
                usize::try_from(p)
                    .ok()
                    .and_then(|i| values.get(i))
                    .map(|&v| PositionRead::valid(v))
                    .unwrap_or_else(PositionRead::missing)
            })
            .collect())
    }
}

/// Write an index table with a header row into `dir`.
pub fn write_index_table(dir: &Path, rows: &[(u64, i64)]) -> PathBuf {
    let path = dir.join("netcdf_index.csv");
    let mut file = std::fs::File::create(&path).expect("Failed to create index table");
    writeln!(file, "{}", INDEX_HEADER).expect("Failed to write index header");
    for (position, comid) in rows {
        writeln!(file, "{},{}", position, comid).expect("Failed to write index row");
    }
    path
}

/// Write the fixture index table ([`INDEX_ROWS`]) into `dir`.
pub fn write_fixture_index_table(dir: &Path) -> PathBuf {
    write_index_table(dir, INDEX_ROWS)
}

/// Distinct synthetic short-range paths, useful for dispatcher tests.
pub fn synthetic_short_range_paths(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "forecast/nwm.20200515/short_range/nwm.t10z.short_range.channel_rt.f{:03}.conus.nc",
                i + 1
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_positions() {
        let source = MemorySource::new().with_file("a.nc", vec![100.0, 250.0]);
        let reads = source.read_positions("a.nc", &[1, 0, 5]).unwrap();

        assert_eq!(reads[0], PositionRead::valid(250.0));
        assert_eq!(reads[1], PositionRead::valid(100.0));
        assert_eq!(reads[2], PositionRead::missing());
        assert_eq!(source.read_log(), vec!["a.nc".to_string()]);
    }

    #[test]
    fn test_memory_source_failures() {
        let source = MemorySource::new()
            .with_fallback(vec![1.0])
            .with_corrupt_file("bad.nc")
            .with_missing_variable("novar.nc");

        assert!(matches!(
            source.read_positions("bad.nc", &[0]),
            Err(SourceError::OpenFailed { .. })
        ));
        assert!(matches!(
            source.read_positions("novar.nc", &[0]),
            Err(SourceError::MissingVariable { .. })
        ));
        assert!(source.read_positions("anything.nc", &[0]).is_ok());
    }

    #[test]
    fn test_memory_source_unknown_file() {
        let source = MemorySource::new();
        assert!(matches!(
            source.read_positions("nope.nc", &[0]),
            Err(SourceError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_write_index_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture_index_table(dir.path());
        let content = std::fs::read_to_string(path).unwrap();

        assert!(content.starts_with(INDEX_HEADER));
        assert!(content.contains("42,900"));
        assert_eq!(content.lines().count(), INDEX_ROWS.len() + 1);
    }

    #[test]
    fn test_synthetic_paths_are_distinct() {
        let paths = synthetic_short_range_paths(18);
        let unique: HashSet<_> = paths.iter().collect();
        assert_eq!(unique.len(), 18);
        assert!(paths[17].contains(".f018."));
    }
}
