//! Tunable settings for attribution and aggregation.
#![forbid(unsafe_code)]

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::{AttributionConfigError, RecencyDecay, SeverityTable};

/// Attribution radius applied when none is configured.
pub const DEFAULT_DISTANCE_THRESHOLD_KM: f64 = 0.1;

/// Events handed to the worker pool per batch.
pub const DEFAULT_CHUNK_SIZE: NonZeroUsize = match NonZeroUsize::new(4096) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Settings for the crime attribution engine.
///
/// # Examples
/// ```
/// use safestreets_scorer::{AttributionConfig, RecencyDecay, SeverityTable};
///
/// # fn main() -> Result<(), safestreets_scorer::AttributionConfigError> {
/// let config = AttributionConfig::new(SeverityTable::default(), RecencyDecay::new(0.05)?, 0.2)?;
/// assert_eq!(config.distance_threshold_km(), 0.2);
/// assert!(AttributionConfig::new(SeverityTable::default(), RecencyDecay::default(), 0.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AttributionConfig {
    severity: SeverityTable,
    decay: RecencyDecay,
    distance_threshold_km: f64,
    chunk_size: NonZeroUsize,
}

impl AttributionConfig {
    /// Validate and build an attribution config.
    ///
    /// # Errors
    ///
    /// Returns [`AttributionConfigError::InvalidDistanceThreshold`] unless the
    /// threshold is finite and positive.
    pub fn new(
        severity: SeverityTable,
        decay: RecencyDecay,
        distance_threshold_km: f64,
    ) -> Result<Self, AttributionConfigError> {
        if !distance_threshold_km.is_finite() || distance_threshold_km <= 0.0 {
            return Err(AttributionConfigError::InvalidDistanceThreshold {
                km: distance_threshold_km,
            });
        }
        Ok(Self {
            severity,
            decay,
            distance_threshold_km,
            chunk_size: DEFAULT_CHUNK_SIZE,
        })
    }

    /// Override how many events each parallel batch holds.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: NonZeroUsize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Offense weights.
    #[must_use]
    pub const fn severity(&self) -> &SeverityTable {
        &self.severity
    }

    /// Recency decay.
    #[must_use]
    pub const fn decay(&self) -> RecencyDecay {
        self.decay
    }

    /// Crimes at or beyond this distance from every street centroid are
    /// discarded.
    #[must_use]
    pub const fn distance_threshold_km(&self) -> f64 {
        self.distance_threshold_km
    }

    /// Events per parallel batch.
    #[must_use]
    pub const fn chunk_size(&self) -> NonZeroUsize {
        self.chunk_size
    }
}

impl Default for AttributionConfig {
    fn default() -> Self {
        Self {
            severity: SeverityTable::default(),
            decay: RecencyDecay::default(),
            distance_threshold_km: DEFAULT_DISTANCE_THRESHOLD_KM,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

/// How accumulated weight becomes a safety score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringPolicy {
    /// `10 - (W / N) / 2`; streets without crimes score `10`.
    #[default]
    MeanWeight,
    /// `5 - 0.1 * W`; streets without crimes score `5`.
    TotalWeight,
}

/// What happens to report lists already stored on a street.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportHistory {
    /// New reports and score replace whatever was stored.
    #[default]
    Overwrite,
    /// New reports are appended and the score is recomputed from the merged
    /// list.
    Append,
}

/// Everything a scoring pass needs besides its inputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringConfig {
    /// Attribution settings.
    pub attribution: AttributionConfig,
    /// Score formula.
    pub policy: ScoringPolicy,
    /// Treatment of stored reports.
    pub history: ReportHistory,
}
