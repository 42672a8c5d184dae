//! Route safety evaluation for the SafeStreets engine.
//!
//! This crate provides [`SafetyRouteEvaluator`], the default implementation of
//! the [`RouteEvaluator`](safestreets_core::RouteEvaluator) trait. Each route
//! coordinate is matched against the street polygons of a read-only
//! [`StreetLookup`](safestreets_core::StreetLookup); matched coordinates take
//! the street's safety score and unmatched ones a configured default. Routes
//! are then ranked by their mean score, safest first.
//!
//! The evaluator never mutates its lookup, so a single instance can serve
//! concurrent requests against one scored street snapshot.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod evaluator;

pub use config::{
    DEFAULT_POINT_SCORE, DEFAULT_WALKING_SPEED_KMH, RouteEvaluatorConfig,
    RouteEvaluatorConfigError,
};
pub use evaluator::{SafetyRouteEvaluator, evaluate_routes, score_route};
