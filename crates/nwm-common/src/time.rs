//! Time handling for NWM publication hours and forecast valid times.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimeParseError;

/// User-facing hour format (`YYYY-MM-DD-HH`), used for input and output times.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d-%H";

/// Issue date as it appears in forecast directory names (`nwm.YYYYMMDD`).
pub const ISSUE_DATE_FORMAT: &str = "%Y%m%d";

/// Minute-resolution stamp at the start of retrospective filenames.
pub const RETROSPECTIVE_FORMAT: &str = "%Y%m%d%H%M";

/// A requested publication hour, always on the hour, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicationHour(DateTime<Utc>);

impl PublicationHour {
    /// Truncate a timestamp down to its hour.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let floored = dt
            .with_minute(0)
            .and_then(|d| d.with_second(0))
            .and_then(|d| d.with_nanosecond(0))
            .unwrap_or(dt);
        Self(floored)
    }

    /// Parse the `YYYY-MM-DD-HH` display form.
    pub fn parse(s: &str) -> Result<Self, TimeParseError> {
        let (date_part, hour_part) = s
            .trim()
            .rsplit_once('-')
            .ok_or_else(|| TimeParseError::InvalidFormat(s.to_string()))?;

        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|_| TimeParseError::InvalidFormat(s.to_string()))?;

        if hour_part.len() != 2 {
            return Err(TimeParseError::InvalidFormat(s.to_string()));
        }
        let hour: u32 = hour_part
            .parse()
            .map_err(|_| TimeParseError::InvalidFormat(s.to_string()))?;

        let naive = date
            .and_hms_opt(hour, 0, 0)
            .ok_or_else(|| TimeParseError::HourOutOfRange(s.to_string()))?;

        Ok(Self(Utc.from_utc_datetime(&naive)))
    }

    /// The hour `hours` before the current wall-clock hour.
    pub fn hours_ago(hours: i64) -> Self {
        Self::from_datetime(Utc::now() - Duration::hours(hours))
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for PublicationHour {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::from_datetime(dt)
    }
}

impl FromStr for PublicationHour {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PublicationHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DISPLAY_FORMAT))
    }
}

/// Valid time of a forecast value: issue time plus forecast offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidTime {
    /// Forecast issue (reference) time
    pub reference_time: DateTime<Utc>,
    /// Forecast hour offset from reference time
    pub forecast_hour: u32,
}

impl ValidTime {
    pub fn new(reference_time: DateTime<Utc>, forecast_hour: u32) -> Self {
        Self { reference_time, forecast_hour }
    }

    /// Calculate the actual valid time (reference + forecast offset)
    pub fn valid_datetime(&self) -> DateTime<Utc> {
        self.reference_time + Duration::hours(self.forecast_hour as i64)
    }

    /// Valid time in the `YYYY-MM-DD-HH` display form.
    pub fn display(&self) -> String {
        self.valid_datetime().format(DISPLAY_FORMAT).to_string()
    }
}

/// Synoptic model cycles; medium-range forecasts are only issued at these hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelCycle {
    /// 00Z run
    Z00,
    /// 06Z run
    Z06,
    /// 12Z run
    Z12,
    /// 18Z run
    Z18,
}

impl ModelCycle {
    pub fn from_hour(hour: u32) -> Option<Self> {
        match hour {
            0 => Some(ModelCycle::Z00),
            6 => Some(ModelCycle::Z06),
            12 => Some(ModelCycle::Z12),
            18 => Some(ModelCycle::Z18),
            _ => None,
        }
    }

    /// Walk back hour by hour from `dt` until a cycle hour is reached.
    ///
    /// Returns the timestamp of that cycle (same minutes/seconds as `dt`).
    pub fn latest_issue_at_or_before(dt: DateTime<Utc>) -> DateTime<Utc> {
        let mut current = dt;
        while Self::from_hour(current.hour()).is_none() {
            current -= Duration::hours(1);
        }
        current
    }
}
