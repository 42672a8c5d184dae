//! Unit coverage for end-to-end scoring passes.
#![forbid(unsafe_code)]

use chrono::{DateTime, TimeZone, Utc};
use geo::Coord;
use rstest::{fixture, rstest};
use safestreets_core::test_support::{MemoryStreetStore, square_street};
use safestreets_core::{CrimeEvent, StreetIndexError, StreetPolygon, StreetSource};

use crate::{
    CancelSignal, ReportHistory, ScoringConfig, ScoringError, score_streets,
    score_streets_into, score_streets_with_cancel,
};

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
        .single()
        .expect("valid reference time")
}

#[fixture]
fn streets() -> Vec<StreetPolygon> {
    vec![
        square_street("quiet", -77.01, 38.9, 0.001),
        square_street("busy", -77.0, 38.9, 0.001),
    ]
}

#[fixture]
fn crimes() -> Vec<CrimeEvent> {
    ["HOMICIDE", "THEFT/OTHER", "BURGLARY"]
        .into_iter()
        .map(|offense| {
            CrimeEvent::new(
                Some(Coord {
                    x: -76.9995,
                    y: 38.9005,
                }),
                Some(offense.into()),
                Some("2024/05/20 13:00:00+00".into()),
            )
        })
        .collect()
}

#[rstest]
fn rescoring_with_overwrite_is_idempotent(
    streets: Vec<StreetPolygon>,
    crimes: Vec<CrimeEvent>,
    now: DateTime<Utc>,
) {
    let config = ScoringConfig::default();
    let first = score_streets(streets, &crimes, &config, now).expect("first pass");
    let second =
        score_streets(first.streets.clone(), &crimes, &config, now).expect("second pass");
    assert_eq!(first.streets, second.streets);
}

#[rstest]
fn append_history_grows_on_each_pass(
    streets: Vec<StreetPolygon>,
    crimes: Vec<CrimeEvent>,
    now: DateTime<Utc>,
) {
    let config = ScoringConfig {
        history: ReportHistory::Append,
        ..ScoringConfig::default()
    };
    let first = score_streets(streets, &crimes, &config, now).expect("first pass");
    let second = score_streets(first.streets, &crimes, &config, now).expect("second pass");
    let busy = second
        .streets
        .iter()
        .find(|s| s.id().as_str() == "busy")
        .expect("busy street present");
    assert_eq!(busy.reports().len(), 6);
}

#[rstest]
fn quiet_streets_keep_the_baseline(
    streets: Vec<StreetPolygon>,
    crimes: Vec<CrimeEvent>,
    now: DateTime<Utc>,
) {
    let scored = score_streets(streets, &crimes, &ScoringConfig::default(), now).expect("pass");
    let quiet = scored
        .streets
        .iter()
        .find(|s| s.id().as_str() == "quiet")
        .expect("quiet street present");
    assert_eq!(quiet.safety_score().value(), 10.0);
    assert_eq!(scored.summary.streets_with_crimes, 1);
    assert_eq!(scored.summary.attribution.attributed, 3);
}

#[rstest]
fn empty_street_collection_is_an_index_error(crimes: Vec<CrimeEvent>, now: DateTime<Utc>) {
    let result = score_streets(Vec::new(), &crimes, &ScoringConfig::default(), now);
    assert!(matches!(
        result,
        Err(ScoringError::Index(StreetIndexError::Empty))
    ));
}

#[rstest]
fn cancelled_runs_produce_no_scores(
    streets: Vec<StreetPolygon>,
    crimes: Vec<CrimeEvent>,
    now: DateTime<Utc>,
) {
    let signal = CancelSignal::new();
    signal.cancel();
    let result =
        score_streets_with_cancel(streets, &crimes, &ScoringConfig::default(), now, &signal);
    assert!(matches!(
        result,
        Err(ScoringError::Cancelled {
            events_applied: 0,
            events_total: 3
        })
    ));
}

#[rstest]
fn scored_streets_reach_the_sink(
    streets: Vec<StreetPolygon>,
    crimes: Vec<CrimeEvent>,
    now: DateTime<Utc>,
) {
    let mut store = MemoryStreetStore::default();
    let summary = score_streets_into(&mut store, streets, &crimes, &ScoringConfig::default(), now)
        .expect("scoring succeeds");
    let persisted = store.load_streets().expect("memory store is infallible");
    assert_eq!(persisted.len(), summary.streets_total);
    assert!(persisted.iter().any(|s| !s.reports().is_empty()));
}
