//! Crime attribution and street safety scoring for the SafeStreets engine.
//!
//! A scoring pass has three stages:
//! - **Indexing** builds a [`StreetIndex`] over the street collection.
//! - **Attribution** weighs each crime by offense severity and recency and
//!   credits it to the nearest street centroid within a distance threshold
//!   (see [`attribute_crimes`]).
//! - **Aggregation** converts each street's accumulated weight into a
//!   [`SafetyScore`](safestreets_core::SafetyScore) and replaces or extends
//!   its report history (see [`aggregate_scores`]).
//!
//! [`score_streets`] runs all three; [`score_streets_into`] additionally
//! persists the result through a [`StreetSink`].
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use geo::Coord;
//! use safestreets_core::CrimeEvent;
//! use safestreets_core::test_support::square_street;
//! use safestreets_scorer::{ScoringConfig, score_streets};
//!
//! # fn main() -> Result<(), safestreets_scorer::ScoringError> {
//! let streets = vec![square_street("1", -77.0, 38.9, 0.001)];
//! let crimes = vec![CrimeEvent::new(
//!     Some(Coord { x: -76.9995, y: 38.9005 }),
//!     Some("ROBBERY".into()),
//!     Some("2024-01-01T00:00:00Z".into()),
//! )];
//! let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let scored = score_streets(streets, &crimes, &ScoringConfig::default(), now)?;
//! assert_eq!(scored.streets[0].safety_score().value(), 6.0);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod accumulator;
mod aggregate;
mod attribution;
mod cancel;
mod config;
mod error;
mod recency;
mod severity;

use chrono::{DateTime, Utc};
use log::info;
use safestreets_core::{CrimeEvent, StreetIndex, StreetPolygon, StreetSink};
use serde::Serialize;

pub use accumulator::{CrimeAccumulator, StreetTally};
pub use aggregate::aggregate_scores;
pub use attribution::{AttributionRun, AttributionStats, RejectReason, attribute_crimes};
pub use cancel::CancelSignal;
pub use config::{
    AttributionConfig, DEFAULT_CHUNK_SIZE, DEFAULT_DISTANCE_THRESHOLD_KM, ReportHistory,
    ScoringConfig, ScoringPolicy,
};
pub use error::{AttributionConfigError, ScoringError};
pub use recency::{DEFAULT_DECAY_RATE, RecencyDecay, age_in_days, parse_report_timestamp};
pub use severity::{DC_OFFENSE_WEIGHTS, DEFAULT_SEVERITY, SeverityTable};

/// Outline of a completed scoring pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringSummary {
    /// Streets in the collection.
    pub streets_total: usize,
    /// Streets left out of spatial queries because of invalid rings.
    pub streets_skipped: usize,
    /// Streets credited with at least one new crime.
    pub streets_with_crimes: usize,
    /// Attribution counters.
    pub attribution: AttributionStats,
}

/// Streets after a scoring pass, in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredStreets {
    /// Rescored streets.
    pub streets: Vec<StreetPolygon>,
    /// What the pass did.
    pub summary: ScoringSummary,
}

/// Score `streets` against `events` using `now` as the recency reference.
///
/// Re-running with the same inputs and `now` under
/// [`ReportHistory::Overwrite`] yields identical scores and reports.
///
/// # Errors
///
/// Returns [`ScoringError::Index`] when the streets cannot be indexed.
pub fn score_streets(
    streets: Vec<StreetPolygon>,
    events: &[CrimeEvent],
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> Result<ScoredStreets, ScoringError> {
    score_streets_with_cancel(streets, events, config, now, &CancelSignal::new())
}

/// Like [`score_streets`], but stops when `cancel` fires.
///
/// Scores are only produced for complete runs; a cancelled run leaves the
/// caller's persisted state untouched.
///
/// # Errors
///
/// Returns [`ScoringError::Index`] when the streets cannot be indexed and
/// [`ScoringError::Cancelled`] when the signal fires before every event has
/// been attributed.
pub fn score_streets_with_cancel(
    streets: Vec<StreetPolygon>,
    events: &[CrimeEvent],
    config: &ScoringConfig,
    now: DateTime<Utc>,
    cancel: &CancelSignal,
) -> Result<ScoredStreets, ScoringError> {
    let index = StreetIndex::build(streets)?;
    let run = attribute_crimes(events, &index, &config.attribution, now, cancel);
    if run.interrupted {
        return Err(ScoringError::Cancelled {
            events_applied: run.events_applied,
            events_total: events.len(),
        });
    }

    let summary = ScoringSummary {
        streets_total: index.len(),
        streets_skipped: index.skipped(),
        streets_with_crimes: run.accumulator.len(),
        attribution: run.stats,
    };
    let streets = aggregate_scores(
        index.into_streets(),
        run.accumulator,
        config.policy,
        config.history,
    );
    info!(
        "scored {} streets; {} received new crimes",
        summary.streets_total, summary.streets_with_crimes
    );
    Ok(ScoredStreets { streets, summary })
}

/// Score streets and hand the result to `sink`.
///
/// # Errors
///
/// Propagates errors from [`score_streets`] and wraps sink failures in
/// [`ScoringError::Persist`].
pub fn score_streets_into<S>(
    sink: &mut S,
    streets: Vec<StreetPolygon>,
    events: &[CrimeEvent],
    config: &ScoringConfig,
    now: DateTime<Utc>,
) -> Result<ScoringSummary, ScoringError>
where
    S: StreetSink + ?Sized,
{
    let scored = score_streets(streets, events, config, now)?;
    sink.persist_streets(&scored.streets)
        .map_err(|source| ScoringError::Persist {
            source: Box::new(source),
        })?;
    Ok(scored.summary)
}

#[cfg(test)]
mod tests;
