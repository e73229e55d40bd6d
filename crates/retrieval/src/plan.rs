//! Turning a request into a concrete batch of paths.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::FetchOptions;
use crate::era::ForecastEra;
use crate::error::FetchError;
use crate::paths::{medium_range_paths, retrospective_paths, short_range_paths};

/// Forecast products a caller can ask for.
///
/// Ignored for hours that only the retrospective archive covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductRequest {
    #[default]
    Short,
    Medium,
    /// Short range followed by medium range.
    Both,
}

impl FromStr for ProductRequest {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" | "short_range" => Ok(ProductRequest::Short),
            "medium" | "medium_range" => Ok(ProductRequest::Medium),
            "both" => Ok(ProductRequest::Both),
            other => Err(FetchError::InvalidConfig(format!(
                "unknown product '{}', expected short, medium or both",
                other
            ))),
        }
    }
}

impl fmt::Display for ProductRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProductRequest::Short => "short",
            ProductRequest::Medium => "medium",
            ProductRequest::Both => "both",
        };
        f.write_str(s)
    }
}

/// What a batch contains, which decides its worker count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchKind {
    Retrospective,
    ShortRange,
    MediumRange,
    Mixed,
}

/// A fully resolved batch, ready to dispatch.
#[derive(Debug, Clone)]
pub struct FetchPlan {
    pub era: ForecastEra,
    pub kind: BatchKind,
    pub paths: Vec<String>,
    pub workers: usize,
}

impl FetchPlan {
    pub fn build(
        requested: DateTime<Utc>,
        era: ForecastEra,
        product: ProductRequest,
        options: &FetchOptions,
    ) -> Self {
        let policy = &options.workers;

        let (kind, paths, workers) = match (era, product) {
            (ForecastEra::Retrospective, _) => (
                BatchKind::Retrospective,
                retrospective_paths(requested, options.window_days),
                policy.retrospective,
            ),
            (_, ProductRequest::Short) => (
                BatchKind::ShortRange,
                short_range_paths(requested),
                policy.short_range,
            ),
            (_, ProductRequest::Medium) => (
                BatchKind::MediumRange,
                medium_range_paths(requested, era),
                policy.medium_range,
            ),
            (_, ProductRequest::Both) => {
                let mut paths = short_range_paths(requested);
                paths.extend(medium_range_paths(requested, era));
                (BatchKind::Mixed, paths, policy.medium_range)
            }
        };

        Self {
            era,
            kind,
            paths,
            workers,
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_product_request_parse() {
        assert_eq!("short".parse::<ProductRequest>().unwrap(), ProductRequest::Short);
        assert_eq!("Medium".parse::<ProductRequest>().unwrap(), ProductRequest::Medium);
        assert_eq!("both".parse::<ProductRequest>().unwrap(), ProductRequest::Both);
        assert!("long".parse::<ProductRequest>().is_err());
        assert_eq!(ProductRequest::default(), ProductRequest::Short);
    }

    #[test]
    fn test_retrospective_ignores_product() {
        let plan = FetchPlan::build(
            at(2000, 1, 1, 0),
            ForecastEra::Retrospective,
            ProductRequest::Medium,
            &FetchOptions::default(),
        );
        assert_eq!(plan.kind, BatchKind::Retrospective);
        assert_eq!(plan.len(), 239);
        assert_eq!(plan.workers, 20);
    }

    #[test]
    fn test_short_plan() {
        let plan = FetchPlan::build(
            at(2020, 5, 15, 10),
            ForecastEra::Ensemble,
            ProductRequest::Short,
            &FetchOptions::default(),
        );
        assert_eq!(plan.kind, BatchKind::ShortRange);
        assert_eq!(plan.len(), 18);
        assert_eq!(plan.workers, 6);
    }

    #[test]
    fn test_medium_plan_single_member() {
        let plan = FetchPlan::build(
            at(2019, 1, 2, 8),
            ForecastEra::SingleMember,
            ProductRequest::Medium,
            &FetchOptions::default(),
        );
        assert_eq!(plan.kind, BatchKind::MediumRange);
        assert_eq!(plan.len(), 68);
        assert_eq!(plan.workers, 18);
        assert_eq!(
            plan.paths[0],
            "forecast/nwm.20190102/medium_range/nwm.t06z.medium_range.channel_rt.f003.conus.nc"
        );
    }

    #[test]
    fn test_both_is_short_then_medium() {
        let plan = FetchPlan::build(
            at(2020, 5, 15, 10),
            ForecastEra::Ensemble,
            ProductRequest::Both,
            &FetchOptions::default(),
        );
        assert_eq!(plan.kind, BatchKind::Mixed);
        assert_eq!(plan.len(), 18 + 476);
        assert_eq!(plan.workers, 18);
        assert!(plan.paths[17].contains("short_range"));
        assert!(plan.paths[18].contains("medium_range_mem1"));
    }
}
