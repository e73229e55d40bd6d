//! National Water Model streamflow retrieval.
//!
//! Resolves which archive era and naming scheme applies to a publication
//! hour, generates the exact set of archive paths to read, fans them out over
//! a bounded worker pool and folds the per-file results into a
//! product → valid time → values document.
//!
//! # Architecture
//!
//! - [`era`] classifies an hour against the archive cutovers
//! - [`paths`] generates retrospective, short-range and medium-range paths
//! - [`metadata`] recovers product and valid time from a path
//! - [`dispatcher`] reads paths concurrently through a
//!   [`nwm_common::StreamflowSource`]
//! - [`aggregate`] folds outcomes into [`FinalResults`]
//!
//! Per-file failures never abort a run. They surface as a single record in
//! the `Error` product keyed by the failing path.

pub mod aggregate;
pub mod config;
pub mod dispatcher;
pub mod era;
pub mod error;
pub mod index;
pub mod metadata;
pub mod paths;
pub mod pipeline;
pub mod plan;
pub mod record;

// Re-exports
pub use aggregate::{ComidFlow, FinalResults};
pub use config::{FetchOptions, WorkerPolicy};
pub use dispatcher::{process_file, Dispatcher};
pub use era::ForecastEra;
pub use error::{DispatchError, EraError, FetchError, IndexError, PathParseError, Result};
pub use index::IndexTable;
pub use metadata::{
    available_products, classify_product, parse_forecast_time, parse_retrospective_time,
    ERROR_PRODUCT, RETROSPECTIVE_PRODUCT,
};
pub use paths::{medium_range_paths, retrospective_paths, short_range_paths};
pub use pipeline::{fetch, fetch_at, FetchRequest};
pub use plan::{BatchKind, FetchPlan, ProductRequest};
pub use record::{FileOutcome, StreamflowRecord};
