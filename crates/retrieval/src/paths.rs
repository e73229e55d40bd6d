//! Archive path generation.
//!
//! Every generator is a pure function of the requested hour (and era for
//! medium range). Paths are relative to the archive mount point and encode
//! their product and time in the text, which is parsed back later by
//! [`crate::metadata`].

use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use nwm_common::time::ISSUE_DATE_FORMAT;
use nwm_common::ModelCycle;

use crate::era::ForecastEra;

/// Days either side of the requested hour covered by a retrospective fetch.
pub const DEFAULT_WINDOW_DAYS: u32 = 5;

/// Largest accepted retrospective window, one year either side.
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Short-range forecast hours.
pub const SHORT_RANGE_HOURS: RangeInclusive<u32> = 1..=18;

/// Medium-range forecast hours are every 3 hours up to 8.5 days.
pub const MEDIUM_RANGE_STEP: u32 = 3;
pub const MEDIUM_RANGE_LAST_HOUR: u32 = 204;

/// Medium-range ensemble members published in the ensemble era.
pub const ENSEMBLE_MEMBERS: RangeInclusive<u32> = 1..=7;

/// Member used when the era has no medium-range convention of its own.
pub const FALLBACK_MEMBER: u32 = 2;

/// Hourly retrospective paths strictly inside `requested ± window_days`.
///
/// Yields `2 * window_days * 24 - 1` paths in chronological order.
pub fn retrospective_paths(requested: DateTime<Utc>, window_days: u32) -> Vec<String> {
    let start = requested - Duration::days(window_days as i64);
    let total_hours = window_days as i64 * 2 * 24;

    (1..total_hours)
        .map(|i| {
            let t = start + Duration::hours(i);
            // Minutes are always floored to zero in the archive names
            format!(
                "retrospective/full_physics/{}/{}00.CHRTOUT_DOMAIN1.comp",
                t.year(),
                t.format("%Y%m%d%H")
            )
        })
        .collect()
}

/// Short-range paths for forecast hours 1–18 of the cycle issued at `requested`.
pub fn short_range_paths(requested: DateTime<Utc>) -> Vec<String> {
    let date = requested.format(ISSUE_DATE_FORMAT).to_string();
    let hour = requested.hour();

    SHORT_RANGE_HOURS
        .map(|forecast| {
            format!(
                "forecast/nwm.{}/short_range/nwm.t{:02}z.short_range.channel_rt.f{:03}.conus.nc",
                date, hour, forecast
            )
        })
        .collect()
}

/// Medium-range paths for the latest synoptic cycle at or before `requested`.
///
/// The single-member era uses one unnumbered member, the ensemble era members
/// 1–7. Any other era falls back to member 2 with the ensemble naming.
pub fn medium_range_paths(requested: DateTime<Utc>, era: ForecastEra) -> Vec<String> {
    let issue = ModelCycle::latest_issue_at_or_before(requested);
    let (date, start_hour) = issue_bucket(issue.date_naive(), issue.hour());

    match era {
        ForecastEra::SingleMember => medium_range_hours()
            .map(|forecast| {
                format!(
                    "forecast/nwm.{}/medium_range/nwm.t{}z.medium_range.channel_rt.f{:03}.conus.nc",
                    date, start_hour, forecast
                )
            })
            .collect(),
        ForecastEra::Ensemble => ENSEMBLE_MEMBERS
            .flat_map(|member| member_paths(&date, start_hour, member))
            .collect(),
        ForecastEra::Retrospective => member_paths(&date, start_hour, FALLBACK_MEMBER).collect(),
    }
}

fn member_paths<'a>(
    date: &'a str,
    start_hour: &'a str,
    member: u32,
) -> impl Iterator<Item = String> + 'a {
    medium_range_hours().map(move |forecast| {
        format!(
            "forecast/nwm.{}/medium_range_mem{}/nwm.t{}z.medium_range.channel_rt_{}.f{:03}.conus.nc",
            date, member, start_hour, member, forecast
        )
    })
}

/// Forecast hours 3, 6, ..., 204.
pub fn medium_range_hours() -> impl Iterator<Item = u32> {
    (MEDIUM_RANGE_STEP..=MEDIUM_RANGE_LAST_HOUR).step_by(MEDIUM_RANGE_STEP as usize)
}

/// Snap an issue hour to the start hour used in medium-range file names.
///
/// Returns the issue date string and the two-digit start hour. An hour
/// outside 0–23 rolls over to 00 of the following day.
pub fn issue_bucket(date: NaiveDate, hour: u32) -> (String, &'static str) {
    let start_hour = match hour {
        0..=5 => "00",
        6..=11 => "06",
        12..=17 => "12",
        18..=23 => "18",
        _ => {
            let next_day = date + Duration::days(1);
            return (next_day.format(ISSUE_DATE_FORMAT).to_string(), "00");
        }
    };
    (date.format(ISSUE_DATE_FORMAT).to_string(), start_hour)
}
