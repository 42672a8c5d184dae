//! Settings for [`SafetyRouteEvaluator`](crate::SafetyRouteEvaluator).

use safestreets_core::SafetyScore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Score given to coordinates that fall outside every street polygon.
pub const DEFAULT_POINT_SCORE: SafetyScore = SafetyScore::NEUTRAL;

/// Average walking speed, 3 mph.
pub const DEFAULT_WALKING_SPEED_KMH: f64 = 4.828;

/// Rejected route evaluator settings.
#[derive(Debug, Error, PartialEq)]
pub enum RouteEvaluatorConfigError {
    /// The fallback score was outside `0.0..=10.0` or not finite.
    #[error("default point score must lie between 0 and 10; got {score}")]
    InvalidDefaultScore {
        /// Score that was supplied.
        score: f64,
    },
    /// The walking speed was not a finite positive number.
    #[error("walking speed must be a finite, positive number of km/h; got {kmh}")]
    InvalidWalkingSpeed {
        /// Speed that was supplied.
        kmh: f64,
    },
}

/// Configuration for [`SafetyRouteEvaluator`](crate::SafetyRouteEvaluator).
///
/// # Examples
/// ```
/// use safestreets_routes::RouteEvaluatorConfig;
///
/// let config = RouteEvaluatorConfig::new(4.0, 5.0).expect("valid settings");
/// assert_eq!(config.default_point_score().value(), 4.0);
/// assert!(RouteEvaluatorConfig::new(11.0, 5.0).is_err());
/// assert!(RouteEvaluatorConfig::new(5.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawConfig", into = "RawConfig")]
pub struct RouteEvaluatorConfig {
    default_point_score: SafetyScore,
    walking_speed_kmh: f64,
}

impl RouteEvaluatorConfig {
    /// Validate and build a route evaluator config.
    ///
    /// # Errors
    ///
    /// Returns [`RouteEvaluatorConfigError::InvalidDefaultScore`] when the
    /// score is outside `0.0..=10.0` and
    /// [`RouteEvaluatorConfigError::InvalidWalkingSpeed`] unless the speed is
    /// finite and positive.
    pub fn new(
        default_point_score: f64,
        walking_speed_kmh: f64,
    ) -> Result<Self, RouteEvaluatorConfigError> {
        if !(SafetyScore::MIN.value()..=SafetyScore::MAX.value()).contains(&default_point_score) {
            return Err(RouteEvaluatorConfigError::InvalidDefaultScore {
                score: default_point_score,
            });
        }
        if !walking_speed_kmh.is_finite() || walking_speed_kmh <= 0.0 {
            return Err(RouteEvaluatorConfigError::InvalidWalkingSpeed {
                kmh: walking_speed_kmh,
            });
        }
        Ok(Self {
            default_point_score: SafetyScore::new(default_point_score),
            walking_speed_kmh,
        })
    }

    /// Score used for coordinates outside every street.
    #[must_use]
    pub const fn default_point_score(&self) -> SafetyScore {
        self.default_point_score
    }

    /// Speed used to estimate durations.
    #[must_use]
    pub const fn walking_speed_kmh(&self) -> f64 {
        self.walking_speed_kmh
    }
}

impl Default for RouteEvaluatorConfig {
    fn default() -> Self {
        Self {
            default_point_score: DEFAULT_POINT_SCORE,
            walking_speed_kmh: DEFAULT_WALKING_SPEED_KMH,
        }
    }
}

/// Unvalidated wire form, so deserialised configs go through [`RouteEvaluatorConfig::new`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawConfig {
    default_point_score: f64,
    walking_speed_kmh: f64,
}

impl Default for RawConfig {
    fn default() -> Self {
        RouteEvaluatorConfig::default().into()
    }
}

impl From<RouteEvaluatorConfig> for RawConfig {
    fn from(config: RouteEvaluatorConfig) -> Self {
        Self {
            default_point_score: config.default_point_score.value(),
            walking_speed_kmh: config.walking_speed_kmh,
        }
    }
}

impl TryFrom<RawConfig> for RouteEvaluatorConfig {
    type Error = RouteEvaluatorConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        Self::new(raw.default_point_score, raw.walking_speed_kmh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(-0.5)]
    #[case(10.5)]
    #[case(f64::NAN)]
    fn default_score_must_be_on_the_scale(#[case] score: f64) {
        assert!(matches!(
            RouteEvaluatorConfig::new(score, DEFAULT_WALKING_SPEED_KMH),
            Err(RouteEvaluatorConfigError::InvalidDefaultScore { .. })
        ));
    }

    #[rstest]
    #[case(0.0)]
    #[case(-4.0)]
    #[case(f64::INFINITY)]
    fn walking_speed_must_be_positive(#[case] kmh: f64) {
        assert!(matches!(
            RouteEvaluatorConfig::new(5.0, kmh),
            Err(RouteEvaluatorConfigError::InvalidWalkingSpeed { .. })
        ));
    }

    #[rstest]
    fn defaults_are_midpoint_and_three_mph() {
        let config = RouteEvaluatorConfig::default();
        assert_eq!(config.default_point_score(), SafetyScore::NEUTRAL);
        assert_eq!(config.walking_speed_kmh(), 4.828);
    }
}
