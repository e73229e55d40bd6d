//! Metadata extraction from NWM archive paths.
//!
//! Archive paths carry their product and time in the text. These functions
//! recover them so a worker can label every value it reads without opening
//! any side-channel metadata.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use nwm_common::time::{DISPLAY_FORMAT, ISSUE_DATE_FORMAT, RETROSPECTIVE_FORMAT};
use nwm_common::ValidTime;

use crate::error::PathParseError;

/// Product label for every retrospective batch.
pub const RETROSPECTIVE_PRODUCT: &str = "Retrospective";

/// Product label for files that failed as a whole.
pub const ERROR_PRODUCT: &str = "Error";

/// Product label for `path`.
///
/// Anything under the retrospective tree is [`RETROSPECTIVE_PRODUCT`]; a
/// forecast file is labelled by the third dot-separated segment of its name
/// (`short_range`, `medium_range`).
pub fn classify_product(path: &str) -> Result<String, PathParseError> {
    if path.contains("retrospective") {
        return Ok(RETROSPECTIVE_PRODUCT.to_string());
    }

    file_name(path)?
        .split('.')
        .nth(2)
        .map(str::to_string)
        .ok_or_else(|| PathParseError::new(path, "filename has no product segment"))
}

/// Distinct products among `paths`, in first-seen order.
///
/// Paths whose product cannot be determined are skipped.
pub fn available_products<S: AsRef<str>>(paths: &[S]) -> Vec<String> {
    let mut products: Vec<String> = Vec::new();
    for path in paths {
        if let Ok(product) = classify_product(path.as_ref()) {
            if !products.contains(&product) {
                products.push(product);
            }
        }
    }
    products
}

/// Valid time of a retrospective file.
///
/// Example: `retrospective/full_physics/1993/199312312300.CHRTOUT_DOMAIN1.comp`
pub fn parse_retrospective_time(path: &str) -> Result<DateTime<Utc>, PathParseError> {
    let stamp = file_name(path)?
        .split('.')
        .next()
        .unwrap_or_default();

    let naive = NaiveDateTime::parse_from_str(stamp, RETROSPECTIVE_FORMAT)
        .map_err(|e| PathParseError::new(path, format!("bad timestamp '{}': {}", stamp, e)))?;

    Ok(Utc.from_utc_datetime(&naive))
}

/// Valid time of a forecast file: issue time plus forecast offset.
///
/// Example: `forecast/nwm.20190102/medium_range/nwm.t06z.medium_range.channel_rt.f003.conus.nc`
pub fn parse_forecast_time(path: &str) -> Result<DateTime<Utc>, PathParseError> {
    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() < 3 {
        return Err(PathParseError::new(path, "expected <date dir>/<product dir>/<file>"));
    }

    // Issue date: nwm.YYYYMMDD
    let date_dir = segments[segments.len() - 3];
    let date_text = date_dir
        .strip_prefix("nwm.")
        .ok_or_else(|| PathParseError::new(path, format!("bad date directory '{}'", date_dir)))?;
    let issue_date = NaiveDate::parse_from_str(date_text, ISSUE_DATE_FORMAT)
        .map_err(|e| PathParseError::new(path, format!("bad issue date '{}': {}", date_text, e)))?;

    let parts: Vec<&str> = segments[segments.len() - 1].split('.').collect();
    if parts.len() < 5 {
        return Err(PathParseError::new(path, "filename has too few segments"));
    }

    // Issue hour: tHHz
    let issue_hour: u32 = parts[1]
        .strip_prefix('t')
        .and_then(|s| s.strip_suffix('z'))
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| PathParseError::new(path, format!("bad issue hour '{}'", parts[1])))?;

    // Offset: fNNN
    let offset: u32 = parts[4]
        .strip_prefix('f')
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| PathParseError::new(path, format!("bad forecast offset '{}'", parts[4])))?;

    let issued = issue_date
        .and_hms_opt(issue_hour, 0, 0)
        .ok_or_else(|| PathParseError::new(path, format!("issue hour {} out of range", issue_hour)))?;

    Ok(ValidTime::new(Utc.from_utc_datetime(&issued), offset).valid_datetime())
}

/// Valid time of any archive path, in the `YYYY-MM-DD-HH` display form.
pub fn valid_time_label(path: &str, product: &str) -> Result<String, PathParseError> {
    let valid = if product == RETROSPECTIVE_PRODUCT {
        parse_retrospective_time(path)?
    } else {
        parse_forecast_time(path)?
    };
    Ok(valid.format(DISPLAY_FORMAT).to_string())
}

fn file_name(path: &str) -> Result<&str, PathParseError> {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| PathParseError::new(path, "no filename"))
}
