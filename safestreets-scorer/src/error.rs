//! Error types raised while configuring or running a scoring pass.
#![forbid(unsafe_code)]

use safestreets_core::StreetIndexError;
use thiserror::Error;

/// Rejected attribution settings.
#[derive(Debug, Error, PartialEq)]
pub enum AttributionConfigError {
    /// The decay rate was negative or not finite.
    #[error("recency decay rate must be a finite, non-negative number; got {rate}")]
    InvalidDecayRate {
        /// Rate per day that was supplied.
        rate: f64,
    },
    /// The attribution radius was not a finite positive distance.
    #[error("distance threshold must be a finite, positive number of kilometres; got {km}")]
    InvalidDistanceThreshold {
        /// Threshold that was supplied.
        km: f64,
    },
    /// An offense weight was negative or not finite.
    #[error("severity weight for {offense} must be finite and non-negative; got {weight}")]
    InvalidSeverityWeight {
        /// Offense whose weight was rejected.
        offense: String,
        /// Weight that was supplied.
        weight: f64,
    },
    /// The fallback weight was negative or not finite.
    #[error("default severity must be finite and non-negative; got {weight}")]
    InvalidDefaultSeverity {
        /// Weight that was supplied.
        weight: f64,
    },
}

/// Errors raised by [`score_streets`](crate::score_streets) and friends.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// The street collection could not be indexed.
    #[error("failed to index streets")]
    Index(#[from] StreetIndexError),
    /// The run was cancelled before every event was attributed.
    #[error("scoring cancelled after {events_applied} of {events_total} crime events")]
    Cancelled {
        /// Events whose attribution completed before cancellation.
        events_applied: usize,
        /// Events supplied to the run.
        events_total: usize,
    },
    /// The street sink refused the scored collection.
    #[error("failed to persist scored streets")]
    Persist {
        /// Error reported by the sink.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}
