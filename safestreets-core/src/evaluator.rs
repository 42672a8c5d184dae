//! Rank candidate routes by safety.
//!
//! The `RouteEvaluator` trait turns a batch of [`Route`](crate::Route)s into
//! a [`RouteRanking`](crate::RouteRanking). Implementations hold only
//! read-only state, so one evaluator can serve many requests at once.

use crate::{Route, RouteRanking};

/// Score and rank a batch of candidate routes.
///
/// Implementations must be thread-safe (`Send` + `Sync`) and must not mutate
/// shared state while evaluating. The method is infallible: routes that
/// cannot be scored sensibly, such as routes without coordinates, still
/// receive a score so the ranking covers every input.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use safestreets_core::{Route, RouteEvaluator, RouteRanking, RouteScore};
///
/// struct FlatEvaluator;
///
/// impl RouteEvaluator for FlatEvaluator {
///     fn evaluate(&self, routes: &[Route]) -> RouteRanking {
///         RouteRanking::new(
///             routes
///                 .iter()
///                 .enumerate()
///                 .map(|(route_index, route)| RouteScore {
///                     route_index,
///                     summary: route.summary().map(str::to_owned),
///                     avg_safety_score: 5.0,
///                     distance_km: 0.0,
///                     estimated_duration: Duration::ZERO,
///                     samples: route.coordinates().len(),
///                     matched_samples: 0,
///                 })
///                 .collect(),
///         )
///     }
/// }
///
/// let ranking = FlatEvaluator.evaluate(&[Route::from_lat_lng([(0.0, 0.0)], None)]);
/// assert_eq!(ranking.len(), 1);
/// ```
pub trait RouteEvaluator: Send + Sync {
    /// Score every route and return them safest first.
    fn evaluate(&self, routes: &[Route]) -> RouteRanking;
}
