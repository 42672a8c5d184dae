//! Candidate routes and their safety rankings.
//!
//! A [`Route`] is an ordered coordinate sequence supplied by a directions
//! service. Evaluators turn each route into a [`RouteScore`] and collect the
//! scores into a [`RouteRanking`], safest first.

use std::cmp::Ordering;
use std::time::Duration;

use geo::Coord;

/// A candidate route to be ranked.
///
/// Coordinates are held with `x = longitude` and `y = latitude`. Use
/// [`Route::from_lat_lng`] when the source supplies `(latitude, longitude)`
/// pairs.
///
/// # Examples
/// ```
/// use safestreets_core::Route;
///
/// let route = Route::from_lat_lng([(38.9, -77.03), (38.91, -77.02)], Some("via K St".into()));
/// assert_eq!(route.coordinates().len(), 2);
/// assert_eq!(route.coordinates()[0].x, -77.03);
/// assert_eq!(route.summary(), Some("via K St"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    #[cfg_attr(feature = "serde", serde(with = "crate::serde_formats::lat_lon"))]
    coordinates: Vec<Coord<f64>>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    summary: Option<String>,
}

impl Route {
    /// Construct a route from `(longitude, latitude)` coordinates.
    #[must_use]
    pub const fn new(coordinates: Vec<Coord<f64>>, summary: Option<String>) -> Self {
        Self {
            coordinates,
            summary,
        }
    }

    /// Construct a route from `(latitude, longitude)` pairs.
    pub fn from_lat_lng<I>(pairs: I, summary: Option<String>) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let coordinates = pairs
            .into_iter()
            .map(|(lat, lng)| Coord { x: lng, y: lat })
            .collect();
        Self::new(coordinates, summary)
    }

    /// Route vertices in travel order.
    #[must_use]
    pub fn coordinates(&self) -> &[Coord<f64>] {
        &self.coordinates
    }

    /// Optional human-readable label such as "via 14th St".
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Whether the route has no coordinates at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Safety assessment for a single route.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct RouteScore {
    /// Position of the route in the evaluated request.
    pub route_index: usize,
    /// Label copied from the route.
    pub summary: Option<String>,
    /// Mean safety score over all samples; `0.0` for an empty route.
    pub avg_safety_score: f64,
    /// Sum of great-circle distances between consecutive coordinates.
    pub distance_km: f64,
    /// Walking time at the configured speed.
    #[cfg_attr(
        feature = "serde",
        serde(rename = "estimatedDurationSecs", with = "crate::serde_formats::duration_secs")
    )]
    pub estimated_duration: Duration,
    /// Number of coordinates sampled.
    pub samples: usize,
    /// Number of samples that fell inside a street polygon.
    pub matched_samples: usize,
}

impl RouteScore {
    /// Whether the score came from a route without coordinates.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.samples == 0
    }

    fn ranking_order(&self, other: &Self) -> Ordering {
        self.is_empty()
            .cmp(&other.is_empty())
            .then_with(|| other.avg_safety_score.total_cmp(&self.avg_safety_score))
    }
}

/// Route scores ordered from safest to least safe.
///
/// Ordering is stable: routes with equal averages keep their request order,
/// and routes without coordinates always come after routes with coordinates.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use safestreets_core::{RouteRanking, RouteScore};
///
/// let score = |route_index, avg_safety_score, samples| RouteScore {
///     route_index,
///     summary: None,
///     avg_safety_score,
///     distance_km: 0.0,
///     estimated_duration: Duration::ZERO,
///     samples,
///     matched_samples: 0,
/// };
/// let ranking = RouteRanking::new(vec![score(0, 4.0, 3), score(1, 6.0, 2), score(2, 6.0, 5)]);
/// let best = ranking.best().expect("at least one route");
/// assert_eq!(best.route_index, 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct RouteRanking {
    scores: Vec<RouteScore>,
}

impl RouteRanking {
    /// Rank `scores`, safest first.
    #[must_use]
    pub fn new(mut scores: Vec<RouteScore>) -> Self {
        scores.sort_by(RouteScore::ranking_order);
        Self { scores }
    }

    /// The safest route, or `None` when no routes were evaluated.
    #[must_use]
    pub fn best(&self) -> Option<&RouteScore> {
        self.scores.first()
    }

    /// Scores in ranked order.
    #[must_use]
    pub fn scores(&self) -> &[RouteScore] {
        &self.scores
    }

    /// Iterate over scores in ranked order.
    pub fn iter(&self) -> std::slice::Iter<'_, RouteScore> {
        self.scores.iter()
    }

    /// Number of ranked routes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether no routes were ranked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Consume the ranking, returning the ordered scores.
    #[must_use]
    pub fn into_scores(self) -> Vec<RouteScore> {
        self.scores
    }
}

impl<'a> IntoIterator for &'a RouteRanking {
    type Item = &'a RouteScore;
    type IntoIter = std::slice::Iter<'a, RouteScore>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
