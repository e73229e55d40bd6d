//! Per-value records and per-file outcomes.

use serde::{Deserialize, Serialize};

use crate::metadata::ERROR_PRODUCT;

/// One streamflow value read from one archive file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamflowRecord {
    /// Valid time (`YYYY-MM-DD-HH`), or the file path for an error record.
    #[serde(rename = "forecast_time")]
    pub time: String,

    /// Flow in m³/s, `-9999.0` when the position could not be read.
    #[serde(rename = "flow_value")]
    pub value: f64,

    #[serde(rename = "forecast_product")]
    pub product: String,

    #[serde(rename = "netcdf_comid_index")]
    pub location_index: u64,
}

impl StreamflowRecord {
    /// Placeholder record standing in for a file that could not be read.
    pub fn error(path: impl Into<String>) -> Self {
        Self {
            time: path.into(),
            value: 0.0,
            product: ERROR_PRODUCT.to_string(),
            location_index: 0,
        }
    }

    pub fn is_error(&self) -> bool {
        self.product == ERROR_PRODUCT
    }
}

/// Result of processing one archive path.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    /// One record per requested position, in request order.
    Batch(Vec<StreamflowRecord>),
    /// The file could not be read at all.
    Failed { path: String, reason: String },
}

impl FileOutcome {
    pub fn failed(path: impl Into<String>, reason: impl ToString) -> Self {
        FileOutcome::Failed {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, FileOutcome::Failed { .. })
    }

    /// Records to fold. A failed file yields exactly one error record.
    pub fn into_records(self) -> Vec<StreamflowRecord> {
        match self {
            FileOutcome::Batch(records) => records,
            FileOutcome::Failed { path, .. } => vec![StreamflowRecord::error(path)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_outcome_folds_to_single_error_record() {
        let outcome = FileOutcome::failed("forecast/x.nc", "File does not exist");
        assert!(outcome.is_failed());

        let records = outcome.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            StreamflowRecord {
                time: "forecast/x.nc".to_string(),
                value: 0.0,
                product: "Error".to_string(),
                location_index: 0,
            }
        );
        assert!(records[0].is_error());
    }

    #[test]
    fn test_record_field_names() {
        let record = StreamflowRecord {
            time: "2020-05-15-11".to_string(),
            value: 1.5,
            product: "short_range".to_string(),
            location_index: 42,
        };
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["forecast_time"], "2020-05-15-11");
        assert_eq!(json["flow_value"], 1.5);
        assert_eq!(json["forecast_product"], "short_range");
        assert_eq!(json["netcdf_comid_index"], 42);
    }
}
