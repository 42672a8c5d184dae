//! Attribute crime events to the nearest street.
//!
//! Events are processed in chunks. Within a chunk, weighing and the nearest
//! street lookup run on the `rayon` pool; the results are then applied to a
//! [`CrimeAccumulator`] one by one in event order. A chunk that sees the
//! cancel signal part-way through is dropped whole.
#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use log::{debug, info};
use rayon::prelude::*;
use safestreets_core::geometry::is_valid_coord;
use safestreets_core::{CrimeEvent, CrimeReport, StreetId, StreetLookup};
use serde::Serialize;

use crate::recency::{age_in_days, parse_report_timestamp};
use crate::{AttributionConfig, CancelSignal, CrimeAccumulator};

/// Why an event was ignored before weighing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The event had no location.
    MissingLocation,
    /// The location was not a finite WGS84 coordinate.
    InvalidLocation,
    /// The offense was absent or blank.
    MissingOffense,
    /// The report timestamp was absent or blank.
    MissingTimestamp,
}

/// Counters describing an attribution run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributionStats {
    /// Events examined, including rejected ones.
    pub events_seen: usize,
    /// Events credited to a street.
    pub attributed: usize,
    /// Weighed events with no street centroid inside the threshold.
    pub unattributed: usize,
    /// Events without a location.
    pub missing_location: usize,
    /// Events with an unusable location.
    pub invalid_location: usize,
    /// Events without an offense.
    pub missing_offense: usize,
    /// Events without a timestamp.
    pub missing_timestamp: usize,
    /// Weighed events whose offense used the default severity.
    pub unknown_offenses: usize,
    /// Weighed events whose timestamp could not be parsed.
    pub unparsable_timestamps: usize,
    /// Weighed events reported after the reference time.
    pub future_timestamps: usize,
}

impl AttributionStats {
    /// Events rejected for any reason.
    #[must_use]
    pub const fn rejected(&self) -> usize {
        self.missing_location + self.invalid_location + self.missing_offense + self.missing_timestamp
    }

    fn reject(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::MissingLocation => self.missing_location += 1,
            RejectReason::InvalidLocation => self.invalid_location += 1,
            RejectReason::MissingOffense => self.missing_offense += 1,
            RejectReason::MissingTimestamp => self.missing_timestamp += 1,
        }
    }
}

/// Result of [`attribute_crimes`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributionRun {
    /// Per-street totals for every applied event.
    pub accumulator: CrimeAccumulator,
    /// Counters for applied events.
    pub stats: AttributionStats,
    /// Whether the run stopped early because of cancellation.
    pub interrupted: bool,
    /// Number of events whose results were applied.
    pub events_applied: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimestampState {
    Parsed,
    Future,
    Unparsable,
}

#[derive(Debug)]
enum Outcome<'a> {
    Rejected(RejectReason),
    Weighed {
        street: Option<&'a StreetId>,
        report: CrimeReport,
        known_offense: bool,
        timestamp: TimestampState,
    },
}

/// Attribute `events` to streets in `lookup`.
///
/// Each event is weighed as `severity * exp(-rate * age_days)` and credited to
/// the street with the nearest centroid when that centroid lies strictly
/// closer than the configured threshold. Ties go to the street inserted
/// first. `now` is the reference time for recency, so repeated runs with the
/// same inputs give identical results.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use geo::Coord;
/// use safestreets_core::test_support::square_street;
/// use safestreets_core::{CrimeEvent, StreetIndex, StreetId};
/// use safestreets_scorer::{AttributionConfig, CancelSignal, attribute_crimes};
///
/// let index = StreetIndex::build(vec![square_street("1", -77.0, 38.9, 0.001)]).unwrap();
/// let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let event = CrimeEvent::new(
///     Some(Coord { x: -76.9995, y: 38.9005 }),
///     Some("ROBBERY".into()),
///     Some("2024-01-01T00:00:00Z".into()),
/// );
/// let run = attribute_crimes(&[event], &index, &AttributionConfig::default(), now, &CancelSignal::new());
/// let tally = run.accumulator.tally(&StreetId::from("1")).unwrap();
/// assert_eq!(tally.total_weight, 8.0);
/// assert!(!run.interrupted);
/// ```
pub fn attribute_crimes<L>(
    events: &[CrimeEvent],
    lookup: &L,
    config: &AttributionConfig,
    now: DateTime<Utc>,
    cancel: &CancelSignal,
) -> AttributionRun
where
    L: StreetLookup + ?Sized,
{
    let mut run = AttributionRun::default();
    for chunk in events.chunks(config.chunk_size().get()) {
        if cancel.is_cancelled() {
            run.interrupted = true;
            break;
        }
        let outcomes: Option<Vec<Outcome<'_>>> = chunk
            .par_iter()
            .map(|event| (!cancel.is_cancelled()).then(|| classify(event, lookup, config, now)))
            .collect();
        let Some(outcomes) = outcomes else {
            debug!("discarding a chunk of {} events after cancellation", chunk.len());
            run.interrupted = true;
            break;
        };
        for outcome in outcomes {
            apply(&mut run, outcome);
        }
        run.events_applied += chunk.len();
    }
    info!(
        "attributed {} of {} crime events ({} rejected, {} beyond threshold{})",
        run.stats.attributed,
        events.len(),
        run.stats.rejected(),
        run.stats.unattributed,
        if run.interrupted { ", interrupted" } else { "" },
    );
    run
}

fn apply(run: &mut AttributionRun, outcome: Outcome<'_>) {
    run.stats.events_seen += 1;
    match outcome {
        Outcome::Rejected(reason) => {
            debug!("rejected crime event: {reason:?}");
            run.stats.reject(reason);
        }
        Outcome::Weighed {
            street,
            report,
            known_offense,
            timestamp,
        } => {
            if !known_offense {
                run.stats.unknown_offenses += 1;
            }
            match timestamp {
                TimestampState::Parsed => {}
                TimestampState::Future => run.stats.future_timestamps += 1,
                TimestampState::Unparsable => run.stats.unparsable_timestamps += 1,
            }
            if let Some(id) = street {
                run.accumulator.record(id, report);
                run.stats.attributed += 1;
            } else {
                run.stats.unattributed += 1;
            }
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "final weight is the product of severity and recency"
)]
fn classify<'a, L>(
    event: &CrimeEvent,
    lookup: &'a L,
    config: &AttributionConfig,
    now: DateTime<Utc>,
) -> Outcome<'a>
where
    L: StreetLookup + ?Sized,
{
    let Some(location) = event.location else {
        return Outcome::Rejected(RejectReason::MissingLocation);
    };
    if !is_valid_coord(location) {
        return Outcome::Rejected(RejectReason::InvalidLocation);
    }
    let Some(offense) = non_blank(event.offense.as_deref()) else {
        return Outcome::Rejected(RejectReason::MissingOffense);
    };
    let Some(reported_at) = non_blank(event.reported_at.as_deref()) else {
        return Outcome::Rejected(RejectReason::MissingTimestamp);
    };

    let severity = config.severity();
    let known = severity.weight(offense);
    let base_weight = known.unwrap_or(severity.default_weight());

    let (recency_multiplier, timestamp) = match parse_report_timestamp(reported_at) {
        Some(reported) if reported > now => (1.0, TimestampState::Future),
        Some(reported) => (
            config.decay().multiplier(age_in_days(reported, now)),
            TimestampState::Parsed,
        ),
        None => (1.0, TimestampState::Unparsable),
    };

    let threshold = config.distance_threshold_km();
    let nearest = lookup
        .nearest_candidates(location, threshold)
        .into_iter()
        .next()
        .filter(|candidate| candidate.distance_km < threshold);

    Outcome::Weighed {
        street: nearest.map(|candidate| candidate.street.id()),
        report: CrimeReport {
            offense: offense.to_owned(),
            reported_at: reported_at.to_owned(),
            context: event.context.clone(),
            distance_km: nearest.map_or(f64::INFINITY, |candidate| candidate.distance_km),
            base_weight,
            recency_multiplier,
            final_weight: base_weight * recency_multiplier,
        },
        known_offense: known.is_some(),
        timestamp,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}
