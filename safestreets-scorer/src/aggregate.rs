//! Turn accumulated crime weight into bounded safety scores.
#![forbid(unsafe_code)]

use safestreets_core::{SafetyScore, StreetPolygon};

use crate::{CrimeAccumulator, ReportHistory, ScoringPolicy};

impl ScoringPolicy {
    /// Score for a street with `total_weight` spread over `crime_count` crimes.
    ///
    /// # Examples
    /// ```
    /// use safestreets_scorer::ScoringPolicy;
    ///
    /// assert_eq!(ScoringPolicy::MeanWeight.score(0.0, 0).value(), 10.0);
    /// assert_eq!(ScoringPolicy::MeanWeight.score(16.0, 2).value(), 6.0);
    /// assert_eq!(ScoringPolicy::TotalWeight.score(0.0, 0).value(), 5.0);
    /// assert_eq!(ScoringPolicy::TotalWeight.score(20.0, 3).value(), 3.0);
    /// assert_eq!(ScoringPolicy::MeanWeight.score(1e9, 1).value(), 0.0);
    /// ```
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "score formulas are floating point; crime counts stay far below 2^52"
    )]
    pub fn score(self, total_weight: f64, crime_count: usize) -> SafetyScore {
        match self {
            Self::MeanWeight if crime_count == 0 => SafetyScore::MAX,
            Self::MeanWeight => {
                let mean = total_weight / crime_count as f64;
                SafetyScore::new(10.0 - mean / 2.0)
            }
            Self::TotalWeight if crime_count == 0 => SafetyScore::NEUTRAL,
            Self::TotalWeight => SafetyScore::new(5.0 - 0.1 * total_weight),
        }
    }
}

/// Apply accumulated tallies to `streets`, returning them in the same order.
///
/// Every street is rescored, including those without attributed crimes,
/// which fall back to the policy's baseline under
/// [`ReportHistory::Overwrite`]. Under [`ReportHistory::Append`] new reports
/// follow the stored ones and the score covers the merged list.
#[must_use]
pub fn aggregate_scores(
    streets: Vec<StreetPolygon>,
    mut accumulator: CrimeAccumulator,
    policy: ScoringPolicy,
    history: ReportHistory,
) -> Vec<StreetPolygon> {
    streets
        .into_iter()
        .map(|street| {
            let tally = accumulator.take(street.id()).unwrap_or_default();
            match history {
                ReportHistory::Overwrite => {
                    let score = policy.score(tally.total_weight, tally.crime_count);
                    street.rescored(score, tally.reports)
                }
                ReportHistory::Append => {
                    let mut reports = street.reports().to_vec();
                    reports.extend(tally.reports);
                    let total: f64 = reports.iter().map(|r| r.final_weight).sum();
                    let score = policy.score(total, reports.len());
                    street.rescored(score, reports)
                }
            }
        })
        .collect()
}
