//! Street polygons and their safety scores.

use std::fmt;

use geo::Coord;

use crate::CrimeReport;
use crate::geometry::is_valid_ring;

/// Opaque key identifying a street polygon.
///
/// # Examples
/// ```
/// use safestreets_core::StreetId;
///
/// let id = StreetId::from("1042");
/// assert_eq!(id.as_str(), "1042");
/// assert_eq!(id.to_string(), "1042");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct StreetId(String);

impl StreetId {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StreetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for StreetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for StreetId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A safety score bounded to `0.0..=10.0`, where higher is safer.
///
/// Construction clamps out-of-range values and maps `NaN` to `0.0`, so a
/// `SafetyScore` can never leave its range.
///
/// # Examples
/// ```
/// use safestreets_core::SafetyScore;
///
/// assert_eq!(SafetyScore::new(12.5).value(), 10.0);
/// assert_eq!(SafetyScore::new(-3.0).value(), 0.0);
/// assert_eq!(SafetyScore::new(f64::NAN).value(), 0.0);
/// assert_eq!(SafetyScore::new(7.25).value(), 7.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "f64", into = "f64")
)]
pub struct SafetyScore(f64);

impl SafetyScore {
    /// Lowest representable score.
    pub const MIN: Self = Self(0.0);
    /// Highest representable score.
    pub const MAX: Self = Self(10.0);
    /// Midpoint of the scale.
    pub const NEUTRAL: Self = Self(5.0);

    /// Clamp `raw` into the score range.
    #[must_use]
    pub const fn new(raw: f64) -> Self {
        if raw.is_nan() {
            return Self::MIN;
        }
        Self(raw.clamp(Self::MIN.0, Self::MAX.0))
    }

    /// The score as a plain number.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl Default for SafetyScore {
    /// Streets start out at the top of the scale until crimes say otherwise.
    fn default() -> Self {
        Self::MAX
    }
}

impl From<f64> for SafetyScore {
    fn from(raw: f64) -> Self {
        Self::new(raw)
    }
}

impl From<SafetyScore> for f64 {
    fn from(score: SafetyScore) -> Self {
        score.0
    }
}

impl fmt::Display for SafetyScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// A street segment represented by the outer ring of its polygon.
///
/// The score and report history are read-only to everyone except the safety
/// score aggregator. Importers restore persisted state through
/// [`StreetPolygon::with_history`]; nothing else writes it.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use safestreets_core::{SafetyScore, StreetPolygon};
///
/// let street = StreetPolygon::new(
///     "7",
///     "Main St",
///     vec![
///         Coord { x: -77.0, y: 38.9 },
///         Coord { x: -77.0, y: 38.901 },
///         Coord { x: -76.999, y: 38.901 },
///     ],
/// );
/// assert_eq!(street.name(), "Main St");
/// assert_eq!(street.safety_score(), SafetyScore::MAX);
/// assert!(street.reports().is_empty());
/// assert!(street.has_valid_ring());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct StreetPolygon {
    id: StreetId,
    name: String,
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_formats::lon_lat"))]
    ring: Vec<Coord<f64>>,
    #[cfg_attr(feature = "serde", serde(default))]
    safety_score: SafetyScore,
    #[cfg_attr(feature = "serde", serde(default))]
    reports: Vec<CrimeReport>,
}

impl StreetPolygon {
    /// Create an unscored street from its ring of `(longitude, latitude)`
    /// vertices.
    pub fn new(id: impl Into<StreetId>, name: impl Into<String>, ring: Vec<Coord<f64>>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ring,
            safety_score: SafetyScore::default(),
            reports: Vec::new(),
        }
    }

    /// Restore a street together with previously persisted scoring state.
    ///
    /// Restore-only: store loaders and fixtures use this to rebuild a street
    /// exactly as it was saved. Scores are never computed through it.
    #[must_use]
    pub fn with_history(self, safety_score: SafetyScore, reports: Vec<CrimeReport>) -> Self {
        self.rescored(safety_score, reports)
    }

    /// Replace the score and report list with a freshly aggregated result.
    ///
    /// Reserved for the safety score aggregator and the single place the
    /// scoring state is assigned.
    #[doc(hidden)]
    #[must_use]
    pub fn rescored(mut self, safety_score: SafetyScore, reports: Vec<CrimeReport>) -> Self {
        self.safety_score = safety_score;
        self.reports = reports;
        self
    }

    /// Identifier of the street.
    #[must_use]
    pub const fn id(&self) -> &StreetId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outer ring with `x = longitude` and `y = latitude`.
    #[must_use]
    pub fn ring(&self) -> &[Coord<f64>] {
        &self.ring
    }

    /// Current safety score.
    #[must_use]
    pub const fn safety_score(&self) -> SafetyScore {
        self.safety_score
    }

    /// Crime reports attributed to the street, oldest attribution first.
    #[must_use]
    pub fn reports(&self) -> &[CrimeReport] {
        &self.reports
    }

    /// Whether the ring can take part in spatial queries.
    #[must_use]
    pub fn has_valid_ring(&self) -> bool {
        is_valid_ring(&self.ring)
    }
}
