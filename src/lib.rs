//! Facade crate for the SafeStreets engine.
//!
//! Re-exports the core domain types and exposes the scorer, the route
//! evaluator and the file adapters behind feature flags.
//!
//! # Examples
//!
//! ```
//! # #[cfg(all(feature = "scorer", feature = "routes"))]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use chrono::{TimeZone, Utc};
//! use safestreets_engine::{
//!     CrimeEvent, Route, RouteEvaluator, RouteEvaluatorConfig, SafetyRouteEvaluator,
//!     ScoringConfig, StreetIndex, StreetPolygon, evaluate_routes, score_route, score_streets,
//! };
//! use geo::Coord;
//!
//! let ring = vec![
//!     Coord { x: -77.001, y: 38.9 },
//!     Coord { x: -77.001, y: 38.901 },
//!     Coord { x: -77.0, y: 38.901 },
//!     Coord { x: -77.0, y: 38.9 },
//! ];
//! let streets = vec![StreetPolygon::new("1", "FIRST ST NW", ring)];
//! let crimes = vec![CrimeEvent::new(
//!     Some(Coord { x: -77.0005, y: 38.9005 }),
//!     Some("ROBBERY".into()),
//!     Some("2024-06-01T00:00:00Z".into()),
//! )];
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! let scored = score_streets(streets, &crimes, &ScoringConfig::default(), now)?;
//!
//! let index = StreetIndex::build(scored.streets)?;
//! let route = Route::from_lat_lng([(38.9005, -77.0005)], None);
//! let config = RouteEvaluatorConfig::default();
//! assert_eq!(score_route(0, &route, &index, &config).avg_safety_score, 6.0);
//! let routes = [route];
//! let direct = evaluate_routes(&routes, &index, &config);
//!
//! let evaluator = SafetyRouteEvaluator::new(index);
//! let ranking = evaluator.evaluate(&routes);
//! assert_eq!(ranking.best().map(|best| best.avg_safety_score), Some(6.0));
//! assert_eq!(ranking, direct);
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "scorer", feature = "routes")))]
//! # fn main() {}
//! ```

#![forbid(unsafe_code)]

pub use safestreets_core::{
    CrimeContext, CrimeEvent, CrimeReport, Route, RouteEvaluator, RouteRanking, RouteScore,
    SafetyScore, StreetId, StreetIndex, StreetIndexError, StreetLookup, StreetPolygon,
    StreetSink, StreetSource,
};

#[cfg(feature = "scorer")]
pub use safestreets_scorer::{
    AttributionConfig, AttributionConfigError, ReportHistory, ScoredStreets, ScoringConfig,
    ScoringError, ScoringPolicy, ScoringSummary, SeverityTable, score_streets,
    score_streets_into,
};

#[cfg(feature = "routes")]
pub use safestreets_routes::{
    RouteEvaluatorConfig, SafetyRouteEvaluator, evaluate_routes, score_route,
};

#[cfg(feature = "data")]
pub use safestreets_data::{
    DataError, JsonStreetStore, load_crimes_geojson, load_route_request, load_streets_geojson,
};
