//! `SafetyRouteEvaluator` implementation over a [`StreetLookup`].

use std::time::Duration;

use geo::Coord;
use log::{debug, info};
use safestreets_core::geometry::{distance_km, is_valid_coord};
use safestreets_core::{Route, RouteEvaluator, RouteRanking, RouteScore, StreetLookup};

use crate::RouteEvaluatorConfig;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Route evaluator that samples every coordinate against street polygons.
///
/// The evaluator is generic over the lookup so the same code serves the
/// R-tree backed [`StreetIndex`](safestreets_core::StreetIndex) in
/// production and simpler lookups in tests.
///
/// # Examples
/// ```
/// use safestreets_core::test_support::square_street;
/// use safestreets_core::{Route, RouteEvaluator, StreetIndex};
/// use safestreets_routes::SafetyRouteEvaluator;
///
/// let index = StreetIndex::build(vec![square_street("1", 0.0, 0.0, 1.0)]).expect("valid street");
/// let evaluator = SafetyRouteEvaluator::new(index);
/// let inside = Route::from_lat_lng([(0.5, 0.5)], Some("inside".into()));
/// let outside = Route::from_lat_lng([(5.0, 5.0)], Some("outside".into()));
/// let ranking = evaluator.evaluate(&[outside, inside]);
/// assert_eq!(ranking.best().and_then(|s| s.summary.as_deref()), Some("inside"));
/// ```
#[derive(Debug, Clone)]
pub struct SafetyRouteEvaluator<L>
where
    L: StreetLookup,
{
    lookup: L,
    config: RouteEvaluatorConfig,
}

impl<L> SafetyRouteEvaluator<L>
where
    L: StreetLookup,
{
    /// Construct an evaluator using default configuration.
    pub fn new(lookup: L) -> Self {
        Self::with_config(lookup, RouteEvaluatorConfig::default())
    }

    /// Construct an evaluator with explicit configuration.
    pub const fn with_config(lookup: L, config: RouteEvaluatorConfig) -> Self {
        Self { lookup, config }
    }

    /// The scored streets routes are matched against.
    pub const fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Active configuration.
    pub const fn config(&self) -> &RouteEvaluatorConfig {
        &self.config
    }
}

impl<L> RouteEvaluator for SafetyRouteEvaluator<L>
where
    L: StreetLookup,
{
    fn evaluate(&self, routes: &[Route]) -> RouteRanking {
        evaluate_routes(routes, &self.lookup, &self.config)
    }
}

/// Score every route in `routes` and rank them safest first.
///
/// Routes without coordinates score `0.0` and sort after every route that
/// has coordinates. Equal averages keep request order.
pub fn evaluate_routes<L>(
    routes: &[Route],
    lookup: &L,
    config: &RouteEvaluatorConfig,
) -> RouteRanking
where
    L: StreetLookup + ?Sized,
{
    let ranking = RouteRanking::new(
        routes
            .iter()
            .enumerate()
            .map(|(route_index, route)| score_route(route_index, route, lookup, config))
            .collect(),
    );
    if let Some(best) = ranking.best() {
        info!(
            "evaluated {} routes; best is #{} averaging {:.2}",
            ranking.len(),
            best.route_index,
            best.avg_safety_score
        );
    }
    ranking
}

/// Score a single route.
///
/// Every coordinate is one sample. A coordinate inside a street polygon takes
/// that street's score; any other coordinate, including non-finite ones,
/// takes the configured default.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "averaging scores over a sample count far below 2^52"
)]
pub fn score_route<L>(
    route_index: usize,
    route: &Route,
    lookup: &L,
    config: &RouteEvaluatorConfig,
) -> RouteScore
where
    L: StreetLookup + ?Sized,
{
    let coordinates = route.coordinates();
    let mut total = 0.0;
    let mut matched_samples = 0;
    for &point in coordinates {
        match lookup.containing(point) {
            Some(street) => {
                total += street.safety_score().value();
                matched_samples += 1;
            }
            None => total += config.default_point_score().value(),
        }
    }

    let samples = coordinates.len();
    let avg_safety_score = if samples == 0 {
        0.0
    } else {
        total / samples as f64
    };
    let distance = path_length_km(coordinates);
    debug!(
        "route #{route_index}: {matched_samples}/{samples} samples on known streets, {distance:.3} km"
    );

    RouteScore {
        route_index,
        summary: route.summary().map(str::to_owned),
        avg_safety_score,
        distance_km: distance,
        estimated_duration: walking_time(distance, config.walking_speed_kmh()),
        samples,
        matched_samples,
    }
}

/// Sum of haversine distances between consecutive valid coordinates.
fn path_length_km(coordinates: &[Coord<f64>]) -> f64 {
    coordinates
        .iter()
        .zip(coordinates.iter().skip(1))
        .filter(|&(&from, &to)| is_valid_coord(from) && is_valid_coord(to))
        .map(|(&from, &to)| distance_km(from, to))
        .sum()
}

#[expect(
    clippy::float_arithmetic,
    reason = "distance over speed gives hours"
)]
fn walking_time(distance_km: f64, speed_kmh: f64) -> Duration {
    Duration::try_from_secs_f64(distance_km / speed_kmh * SECONDS_PER_HOUR)
        .unwrap_or(Duration::MAX)
}
