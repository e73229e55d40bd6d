//! Tunables for a fetch run.
//!
//! Defaults reproduce the fixed policy of the archive fetcher: 20 workers for
//! a retrospective batch, 6 for short range, 18 for medium range or a mixed
//! request, and a five day retrospective window.

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::paths::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};

/// Worker counts per kind of batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerPolicy {
    #[serde(default = "default_retrospective_workers")]
    pub retrospective: usize,
    #[serde(default = "default_short_range_workers")]
    pub short_range: usize,
    /// Also used for mixed short + medium requests.
    #[serde(default = "default_medium_range_workers")]
    pub medium_range: usize,
}

fn default_retrospective_workers() -> usize {
    20
}

fn default_short_range_workers() -> usize {
    6
}

fn default_medium_range_workers() -> usize {
    18
}

impl Default for WorkerPolicy {
    fn default() -> Self {
        Self {
            retrospective: default_retrospective_workers(),
            short_range: default_short_range_workers(),
            medium_range: default_medium_range_workers(),
        }
    }
}

/// Options shaping path generation, dispatch and aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Days either side of a retrospective hour, 1 to [`MAX_WINDOW_DAYS`].
    #[serde(default = "default_window_days")]
    pub window_days: u32,

    #[serde(default)]
    pub workers: WorkerPolicy,

    /// Map location indices back to true comids when aggregating.
    #[serde(default)]
    pub resolve_comids: bool,
}

fn default_window_days() -> u32 {
    DEFAULT_WINDOW_DAYS
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            workers: WorkerPolicy::default(),
            resolve_comids: false,
        }
    }
}

impl FetchOptions {
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.window_days == 0 {
            return Err(FetchError::InvalidConfig(
                "retrospective window must be at least one day".to_string(),
            ));
        }
        if self.window_days > MAX_WINDOW_DAYS {
            return Err(FetchError::InvalidConfig(format!(
                "retrospective window of {} days exceeds the {} day limit",
                self.window_days, MAX_WINDOW_DAYS
            )));
        }

        let workers = [
            ("retrospective", self.workers.retrospective),
            ("short_range", self.workers.short_range),
            ("medium_range", self.workers.medium_range),
        ];
        for (kind, count) in workers {
            if count == 0 {
                return Err(FetchError::InvalidConfig(format!(
                    "{} worker count must be at least 1",
                    kind
                )));
            }
        }
        Ok(())
    }
}
