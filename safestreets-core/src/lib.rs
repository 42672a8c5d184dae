//! Core domain types for the SafeStreets engine.
//!
//! The crate defines street polygons, crime events and reports, candidate
//! routes, the geometry helpers they rely on, and the [`StreetIndex`] that
//! answers spatial queries. Scoring lives in `safestreets-scorer` and route
//! ranking in `safestreets-routes`; both build on the traits defined here.
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod crime;
mod evaluator;
pub mod geometry;
pub mod index;
mod route;
#[cfg(feature = "serde")]
mod serde_formats;
mod store;
mod street;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use crime::{CrimeContext, CrimeEvent, CrimeReport};
pub use evaluator::RouteEvaluator;
pub use index::{Candidate, StreetIndex, StreetIndexError, StreetLookup};
pub use route::{Route, RouteRanking, RouteScore};
pub use store::{StreetSink, StreetSource};
pub use street::{SafetyScore, StreetId, StreetPolygon};
