use chrono::{DateTime, Duration, TimeZone, Utc};
use retrieval::era::{first_ensemble, first_retrospective, first_single_member, resolve};
use retrieval::{EraError, ForecastEra};

fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

#[test]
fn test_before_archive_is_out_of_range() {
    let now = at(2024, 1, 1, 0);
    let requested = first_retrospective() - Duration::hours(1);

    let err = resolve(requested, now).unwrap_err();
    assert_eq!(
        err,
        EraError::OutOfRange {
            requested,
            first: first_retrospective()
        }
    );
}

#[test]
fn test_future_is_not_yet_available() {
    let now = at(2024, 1, 1, 0);
    let err = resolve(now + Duration::hours(1), now).unwrap_err();
    assert!(matches!(err, EraError::NotYetAvailable { .. }));
}

#[test]
fn test_every_cutover_switches_exactly_on_the_hour() {
    let now = at(2024, 1, 1, 0);
    let one_hour = Duration::hours(1);

    assert_eq!(
        resolve(first_single_member() - one_hour, now),
        Ok(ForecastEra::Retrospective)
    );
    assert_eq!(resolve(first_single_member(), now), Ok(ForecastEra::SingleMember));
    assert_eq!(
        resolve(first_ensemble() - one_hour, now),
        Ok(ForecastEra::SingleMember)
    );
    assert_eq!(resolve(first_ensemble(), now), Ok(ForecastEra::Ensemble));
}

#[test]
fn test_reference_scenario_is_ensemble_era() {
    assert_eq!(
        resolve(at(2020, 5, 15, 10), at(2024, 1, 1, 0)),
        Ok(ForecastEra::Ensemble)
    );
    assert!(ForecastEra::Ensemble.is_forecast());
    assert!(!ForecastEra::Retrospective.is_forecast());
}
