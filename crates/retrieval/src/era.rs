//! Archive era resolution.
//!
//! The NWM archive changed layout twice: before the forecast archive existed
//! only the retrospective (reanalysis) run is available; the forecast archive
//! first carried a single medium-range member, then switched to a seven
//! member ensemble.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EraError;

/// First day covered by the retrospective archive.
pub const FIRST_RETROSPECTIVE: (i32, u32, u32) = (1993, 1, 1);

/// First day of the forecast archive (single medium-range member).
pub const FIRST_SINGLE_MEMBER: (i32, u32, u32) = (2018, 9, 17);

/// First day medium-range forecasts were published as an ensemble.
pub const FIRST_ENSEMBLE: (i32, u32, u32) = (2019, 6, 2);

/// Naming and availability regime of the archive for a given hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ForecastEra {
    Retrospective,
    SingleMember,
    Ensemble,
}

impl ForecastEra {
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastEra::Retrospective => "Retrospective-Era",
            ForecastEra::SingleMember => "SingleMember-Era",
            ForecastEra::Ensemble => "Ensemble-Era",
        }
    }

    pub fn is_forecast(&self) -> bool {
        !matches!(self, ForecastEra::Retrospective)
    }
}

impl fmt::Display for ForecastEra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn midnight((year, month, day): (i32, u32, u32)) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Start of the retrospective archive.
pub fn first_retrospective() -> DateTime<Utc> {
    midnight(FIRST_RETROSPECTIVE)
}

/// Start of the single-member forecast archive.
pub fn first_single_member() -> DateTime<Utc> {
    midnight(FIRST_SINGLE_MEMBER)
}

/// Start of the ensemble forecast archive.
pub fn first_ensemble() -> DateTime<Utc> {
    midnight(FIRST_ENSEMBLE)
}

/// Classify `requested` relative to the archive cutovers, as seen at `now`.
pub fn resolve(requested: DateTime<Utc>, now: DateTime<Utc>) -> Result<ForecastEra, EraError> {
    let first = first_retrospective();

    if requested < first {
        return Err(EraError::OutOfRange { requested, first });
    }
    if requested > now {
        return Err(EraError::NotYetAvailable { requested });
    }
    if requested < first_single_member() {
        return Ok(ForecastEra::Retrospective);
    }
    if requested < first_ensemble() {
        return Ok(ForecastEra::SingleMember);
    }
    Ok(ForecastEra::Ensemble)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_era_display() {
        assert_eq!(ForecastEra::Retrospective.to_string(), "Retrospective-Era");
        assert_eq!(ForecastEra::SingleMember.to_string(), "SingleMember-Era");
        assert_eq!(ForecastEra::Ensemble.to_string(), "Ensemble-Era");
    }

    #[test]
    fn test_cutover_instants() {
        assert_eq!(first_retrospective(), at(1993, 1, 1, 0));
        assert_eq!(first_single_member(), at(2018, 9, 17, 0));
        assert_eq!(first_ensemble(), at(2019, 6, 2, 0));
    }

    #[test]
    fn test_boundaries_are_half_open() {
        let now = at(2024, 1, 1, 0);

        assert_eq!(resolve(at(1993, 1, 1, 0), now), Ok(ForecastEra::Retrospective));
        assert_eq!(resolve(at(2018, 9, 16, 23), now), Ok(ForecastEra::Retrospective));
        assert_eq!(resolve(at(2018, 9, 17, 0), now), Ok(ForecastEra::SingleMember));
        assert_eq!(resolve(at(2019, 6, 1, 23), now), Ok(ForecastEra::SingleMember));
        assert_eq!(resolve(at(2019, 6, 2, 0), now), Ok(ForecastEra::Ensemble));
    }

    #[test]
    fn test_now_itself_is_available() {
        let now = at(2024, 1, 1, 5);
        assert_eq!(resolve(now, now), Ok(ForecastEra::Ensemble));
    }
}
