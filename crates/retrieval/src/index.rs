//! Comid ↔ feature position lookup.
//!
//! NWM output files store one value per stream reach along a `feature_id`
//! dimension. The index table maps each reach's comid to its position in that
//! dimension. The file is a two-column delimited table with a header row:
//! column 0 is the position, column 1 the comid.

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::error::{FetchError, IndexError};

/// Forward and reverse lookup between comids and feature positions.
#[derive(Debug, Clone, Default)]
pub struct IndexTable {
    by_comid: HashMap<i64, u64>,
    by_position: HashMap<u64, i64>,
}

impl IndexTable {
    /// Load the table from a file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, IndexError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| IndexError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let table = Self::parse(&content)?;
        info!(
            path = %path.display(),
            entries = table.len(),
            "Loaded index table"
        );
        Ok(table)
    }

    /// Parse table text. The first line is a header and is skipped, as are
    /// blank lines.
    pub fn parse(content: &str) -> Result<Self, IndexError> {
        let mut table = Self::default();

        for (i, raw) in content.lines().enumerate().skip(1) {
            let line_no = i + 1;
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            let mut columns = line.split(',').map(str::trim);
            let (Some(position), Some(comid)) = (columns.next(), columns.next()) else {
                return Err(IndexError::Malformed {
                    line: line_no,
                    reason: "expected two columns".to_string(),
                });
            };

            let position: u64 = position.parse().map_err(|e| IndexError::Malformed {
                line: line_no,
                reason: format!("bad position '{}': {}", position, e),
            })?;
            let comid: i64 = comid.parse().map_err(|e| IndexError::Malformed {
                line: line_no,
                reason: format!("bad comid '{}': {}", comid, e),
            })?;

            table.insert(position, comid);
        }

        Ok(table)
    }

    /// Add a row. A later row for the same comid or position wins.
    pub fn insert(&mut self, position: u64, comid: i64) {
        self.by_comid.insert(comid, position);
        self.by_position.insert(position, comid);
    }

    pub fn position_for(&self, comid: i64) -> Option<u64> {
        self.by_comid.get(&comid).copied()
    }

    pub fn comid_for(&self, position: u64) -> Option<i64> {
        self.by_position.get(&position).copied()
    }

    /// Positions for every comid, in input order.
    ///
    /// The first comid missing from the table aborts with
    /// [`FetchError::UnknownComid`].
    pub fn resolve_all(&self, comids: &[i64]) -> Result<Vec<u64>, FetchError> {
        comids
            .iter()
            .map(|&comid| {
                self.position_for(comid)
                    .ok_or(FetchError::UnknownComid(comid))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.by_comid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_comid.is_empty()
    }
}

impl FromIterator<(u64, i64)> for IndexTable {
    fn from_iter<I: IntoIterator<Item = (u64, i64)>>(iter: I) -> Self {
        let mut table = Self::default();
        for (position, comid) in iter {
            table.insert(position, comid);
        }
        table
    }
}
