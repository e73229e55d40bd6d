//! Path generation properties across eras and products.

use std::collections::HashSet;

use chrono::{DateTime, Duration, TimeZone, Utc};
use retrieval::metadata::valid_time_label;
use retrieval::paths::{issue_bucket, medium_range_hours};
use retrieval::{
    classify_product, medium_range_paths, parse_forecast_time, parse_retrospective_time,
    retrospective_paths, short_range_paths, ForecastEra,
};
use test_utils::archive_paths;

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

#[test]
fn test_short_range_offsets_one_through_eighteen() {
    let requested = at(2020, 5, 15, 10);
    let paths = short_range_paths(requested);

    assert_eq!(paths.len(), 18);
    for (i, path) in paths.iter().enumerate() {
        let offset = i as i64 + 1;
        assert!(path.contains(&format!(".f{:03}.", offset)), "{}", path);
        assert!(path.contains("nwm.t10z.short_range"), "{}", path);
        assert_eq!(
            parse_forecast_time(path).unwrap(),
            requested + Duration::hours(offset)
        );
    }
}

#[test]
fn test_short_range_valid_times_for_reference_scenario() {
    let labels: Vec<String> = short_range_paths(at(2020, 5, 15, 10))
        .iter()
        .map(|p| valid_time_label(p, "short_range").unwrap())
        .collect();

    assert_eq!(labels.first().map(String::as_str), Some("2020-05-15-11"));
    assert_eq!(labels.last().map(String::as_str), Some("2020-05-16-04"));
}

#[test]
fn test_medium_range_counts_per_era() {
    let requested = at(2020, 5, 15, 10);

    assert_eq!(medium_range_paths(requested, ForecastEra::SingleMember).len(), 68);
    assert_eq!(medium_range_paths(requested, ForecastEra::Ensemble).len(), 476);
    assert_eq!(medium_range_paths(requested, ForecastEra::Retrospective).len(), 68);
}

#[test]
fn test_medium_range_ensemble_members_and_offsets() {
    let paths = medium_range_paths(at(2020, 5, 15, 10), ForecastEra::Ensemble);
    let unique: HashSet<&String> = paths.iter().collect();
    assert_eq!(unique.len(), 476);

    for member in 1..=7 {
        let member_paths: Vec<&String> = paths
            .iter()
            .filter(|p| p.contains(&format!("medium_range_mem{}/", member)))
            .collect();
        assert_eq!(member_paths.len(), 68);
        for (path, hour) in member_paths.iter().zip(medium_range_hours()) {
            assert!(path.contains(&format!("channel_rt_{}.f{:03}.", member, hour)));
            assert!(path.contains("nwm.t06z."));
        }
    }
}

#[test]
fn test_medium_range_fallback_era_uses_member_two() {
    // Low-confidence branch: an era without a medium-range layout of its own
    let paths = medium_range_paths(at(2017, 3, 1, 13), ForecastEra::Retrospective);
    assert!(paths.iter().all(|p| p.contains("/medium_range_mem2/")));
    assert!(paths.iter().all(|p| p.contains("nwm.t12z.")));
    assert_eq!(
        paths[0],
        "forecast/nwm.20170301/medium_range_mem2/nwm.t12z.medium_range.channel_rt_2.f003.conus.nc"
    );
}

#[test]
fn test_medium_range_issue_walks_back_within_day() {
    let paths = medium_range_paths(at(2019, 1, 2, 5), ForecastEra::SingleMember);
    assert!(paths[0].starts_with("forecast/nwm.20190102/medium_range/nwm.t00z."));

    let labels: Vec<String> = paths
        .iter()
        .map(|p| valid_time_label(p, "medium_range").unwrap())
        .collect();
    assert_eq!(labels[0], "2019-01-02-03");
    assert_eq!(labels[67], "2019-01-10-12");
}

#[test]
fn test_issue_bucket_default_branch() {
    // Low-confidence branch: unreachable from a well-formed timestamp
    let date = chrono::NaiveDate::from_ymd_opt(2019, 2, 28).unwrap();
    assert_eq!(issue_bucket(date, 30), ("20190301".to_string(), "00"));
}

#[test]
fn test_retrospective_window_is_chronological() {
    let paths = retrospective_paths(at(1995, 7, 4, 12), 5);
    assert_eq!(paths.len(), 239);

    let times: Vec<_> = paths
        .iter()
        .map(|p| parse_retrospective_time(p).unwrap())
        .collect();
    assert!(times.windows(2).all(|w| w[1] - w[0] == Duration::hours(1)));
    assert_eq!(times[0], at(1995, 6, 29, 13));
    assert_eq!(times[238], at(1995, 7, 9, 11));
}

#[test]
fn test_retrospective_year_follows_each_hour() {
    let paths = retrospective_paths(at(1999, 12, 31, 22), 1);
    assert!(paths[0].starts_with("retrospective/full_physics/1999/"));
    assert!(paths
        .last()
        .unwrap()
        .starts_with("retrospective/full_physics/2000/200001012100"));
}

#[test]
fn test_fixture_paths_parse_back() {
    assert_eq!(
        valid_time_label(archive_paths::SHORT_RANGE, "short_range").unwrap(),
        "2019-01-02-12"
    );
    assert_eq!(
        valid_time_label(archive_paths::MEDIUM_RANGE, "medium_range").unwrap(),
        "2019-01-02-09"
    );
    assert_eq!(
        valid_time_label(archive_paths::MEDIUM_RANGE_MEMBER, "medium_range").unwrap(),
        "2020-05-23-18"
    );
    assert_eq!(
        valid_time_label(archive_paths::RETROSPECTIVE, "Retrospective").unwrap(),
        "1993-12-31-23"
    );
    assert_eq!(classify_product(archive_paths::MEDIUM_RANGE_MEMBER).unwrap(), "medium_range");
}
