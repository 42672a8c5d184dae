//! Route command implementation for the SafeStreets CLI.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use safestreets_core::{RouteEvaluator, RouteRanking, RouteScore, StreetIndex, StreetSource};
use safestreets_data::{JsonStreetStore, load_route_request};
use safestreets_routes::{
    DEFAULT_POINT_SCORE, DEFAULT_WALKING_SPEED_KMH, RouteEvaluatorConfig, SafetyRouteEvaluator,
};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ROUTE_DEFAULT_SCORE, ARG_ROUTE_REQUEST, ARG_ROUTE_WALKING_SPEED, ARG_STORE, CliError,
    DEFAULT_STORE_PATH, ENV_ROUTE_REQUEST, require_existing, write_json,
};

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Sample every coordinate of each candidate route against the \
                 scored street store and print the routes ranked from safest \
                 to least safe. The request is a JSON object with a `routes` \
                 array of `[latitude, longitude]` coordinate lists.",
    about = "Rank candidate routes by safety"
)]
#[ortho_config(prefix = "SAFESTREETS")]
pub(crate) struct RouteArgs {
    /// Path to a JSON route request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// JSON street store produced by `safestreets score`.
    #[arg(long = ARG_STORE, value_name = "path")]
    #[serde(default)]
    pub(crate) store: Option<Utf8PathBuf>,
    /// Score for route points outside every street.
    #[arg(long = ARG_ROUTE_DEFAULT_SCORE, value_name = "score")]
    #[serde(default)]
    pub(crate) default_point_score: Option<f64>,
    /// Walking speed used for duration estimates.
    #[arg(long = ARG_ROUTE_WALKING_SPEED, value_name = "kmh")]
    #[serde(default)]
    pub(crate) walking_speed_kmh: Option<f64>,
}

impl RouteArgs {
    pub(crate) fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RouteConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) store: Utf8PathBuf,
    pub(crate) evaluator: RouteEvaluatorConfig,
}

impl RouteConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.request_path, ARG_ROUTE_REQUEST)?;
        require_existing(&self.store, ARG_STORE)?;
        Ok(())
    }
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_ROUTE_REQUEST,
            env: ENV_ROUTE_REQUEST,
        })?;
        let evaluator = RouteEvaluatorConfig::new(
            args.default_point_score
                .unwrap_or_else(|| DEFAULT_POINT_SCORE.value()),
            args.walking_speed_kmh.unwrap_or(DEFAULT_WALKING_SPEED_KMH),
        )?;
        Ok(Self {
            request_path,
            store: args
                .store
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_STORE_PATH)),
            evaluator,
        })
    }
}

/// JSON document printed by `safestreets route`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RouteReport {
    /// Safest route, or `null` when the request held no routes.
    pub(crate) best: Option<RouteScore>,
    /// Every route, safest first.
    pub(crate) ranking: RouteRanking,
}

pub(super) fn run_route(args: RouteArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_route_with(args, &mut stdout)
}

pub(super) fn run_route_with(args: RouteArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let report = execute_route(args)?;
    write_json(writer, &report)
}

fn execute_route(args: RouteArgs) -> Result<RouteReport, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;

    let request = load_route_request(&config.request_path)?;
    let streets = JsonStreetStore::new(config.store.clone()).load_streets()?;
    let index = StreetIndex::build(streets)?;
    info!(
        "ranking {} routes against {} stored streets",
        request.routes.len(),
        index.len()
    );
    let evaluator = SafetyRouteEvaluator::with_config(index, config.evaluator);
    let ranking = evaluator.evaluate(&request.routes);

    Ok(RouteReport {
        best: ranking.best().cloned(),
        ranking,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<RouteConfig, CliError> {
    let merged = RouteArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RouteConfig::try_from(merged)
}
