//! Score command implementation for the SafeStreets CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use safestreets_core::{StreetPolygon, StreetSource};
use safestreets_data::{
    CrimeImportStats, JsonStreetStore, StreetImportStats, load_crimes_geojson,
    load_severity_table, load_streets_geojson,
};
use safestreets_scorer::{
    AttributionConfig, DC_OFFENSE_WEIGHTS, DEFAULT_DECAY_RATE, DEFAULT_DISTANCE_THRESHOLD_KM,
    DEFAULT_SEVERITY, RecencyDecay, ReportHistory, ScoringConfig, ScoringPolicy, ScoringSummary,
    SeverityTable, score_streets_into,
};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_SCORE_CRIMES, ARG_SCORE_DECAY_RATE, ARG_SCORE_DEFAULT_SEVERITY,
    ARG_SCORE_DISTANCE_THRESHOLD, ARG_SCORE_HISTORY, ARG_SCORE_NOW, ARG_SCORE_POLICY,
    ARG_SCORE_SEVERITY, ARG_SCORE_STREETS, ARG_STORE, CliError, DEFAULT_STORE_PATH,
    ENV_SCORE_CRIMES, require_existing, write_json,
};

const POLICY_CHOICES: &str = "mean-weight, total-weight";
const HISTORY_CHOICES: &str = "overwrite, append";

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Attribute every crime in a GeoJSON feed to the nearest street \
                 centroid, recompute street safety scores and write the \
                 scored collection to the street store. Streets come from a \
                 GeoJSON polygon file or, when none is given, from the store \
                 itself.",
    about = "Score streets against a crime feed"
)]
#[ortho_config(prefix = "SAFESTREETS")]
pub(crate) struct ScoreArgs {
    /// GeoJSON FeatureCollection of street polygons.
    #[arg(long = ARG_SCORE_STREETS, value_name = "path")]
    #[serde(default)]
    pub(crate) streets: Option<Utf8PathBuf>,
    /// GeoJSON FeatureCollection of crime incidents.
    #[arg(long = ARG_SCORE_CRIMES, value_name = "path")]
    #[serde(default)]
    pub(crate) crimes: Option<Utf8PathBuf>,
    /// JSON street store to write (and to read when `--streets` is absent).
    #[arg(long = ARG_STORE, value_name = "path")]
    #[serde(default)]
    pub(crate) store: Option<Utf8PathBuf>,
    /// JSON object mapping offense names to severity weights.
    #[arg(long = ARG_SCORE_SEVERITY, value_name = "path")]
    #[serde(default)]
    pub(crate) severity: Option<Utf8PathBuf>,
    /// Weight for offenses missing from the severity table.
    #[arg(long = ARG_SCORE_DEFAULT_SEVERITY, value_name = "weight")]
    #[serde(default)]
    pub(crate) default_severity: Option<f64>,
    /// Exponential recency decay per day of crime age.
    #[arg(long = ARG_SCORE_DECAY_RATE, value_name = "rate")]
    #[serde(default)]
    pub(crate) decay_rate: Option<f64>,
    /// Crimes this far or further from every street centroid are dropped.
    #[arg(long = ARG_SCORE_DISTANCE_THRESHOLD, value_name = "km")]
    #[serde(default)]
    pub(crate) distance_threshold_km: Option<f64>,
    /// Score formula: `mean-weight` or `total-weight`.
    #[arg(long = ARG_SCORE_POLICY, value_name = "policy")]
    #[serde(default)]
    pub(crate) policy: Option<String>,
    /// Stored report handling: `overwrite` or `append`.
    #[arg(long = ARG_SCORE_HISTORY, value_name = "mode")]
    #[serde(default)]
    pub(crate) history: Option<String>,
    /// RFC 3339 reference time for recency decay; defaults to now.
    #[arg(long = ARG_SCORE_NOW, value_name = "timestamp")]
    #[serde(default)]
    pub(crate) now: Option<String>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreConfig {
    /// Street GeoJSON; `None` rescores the store contents.
    pub(crate) streets: Option<Utf8PathBuf>,
    /// Crime GeoJSON.
    pub(crate) crimes: Utf8PathBuf,
    /// Street store written by the command.
    pub(crate) store: Utf8PathBuf,
    /// Optional severity table file.
    pub(crate) severity: Option<Utf8PathBuf>,
    pub(crate) default_severity: f64,
    pub(crate) decay_rate: f64,
    pub(crate) distance_threshold_km: f64,
    pub(crate) policy: ScoringPolicy,
    pub(crate) history: ReportHistory,
    /// Recency reference time.
    pub(crate) now: DateTime<Utc>,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.crimes, ARG_SCORE_CRIMES)?;
        match &self.streets {
            Some(streets) => require_existing(streets, ARG_SCORE_STREETS)?,
            None => require_existing(&self.store, ARG_STORE)?,
        }
        if let Some(severity) = &self.severity {
            require_existing(severity, ARG_SCORE_SEVERITY)?;
        }
        Ok(())
    }

    /// Build the scoring settings, loading the severity table if one is set.
    pub(crate) fn scoring_config(&self) -> Result<ScoringConfig, CliError> {
        let severity = match &self.severity {
            Some(path) => load_severity_table(path, self.default_severity)?,
            None => SeverityTable::from_weights(DC_OFFENSE_WEIGHTS, self.default_severity)?,
        };
        let decay = RecencyDecay::new(self.decay_rate)?;
        let attribution = AttributionConfig::new(severity, decay, self.distance_threshold_km)?;
        Ok(ScoringConfig {
            attribution,
            policy: self.policy,
            history: self.history,
        })
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let crimes = args.crimes.ok_or(CliError::MissingArgument {
            field: ARG_SCORE_CRIMES,
            env: ENV_SCORE_CRIMES,
        })?;
        let policy = args
            .policy
            .as_deref()
            .map(parse_policy)
            .transpose()?
            .unwrap_or_default();
        let history = args
            .history
            .as_deref()
            .map(parse_history)
            .transpose()?
            .unwrap_or_default();
        let now = args
            .now
            .as_deref()
            .map(parse_now)
            .transpose()?
            .unwrap_or_else(Utc::now);

        Ok(Self {
            streets: args.streets,
            crimes,
            store: args
                .store
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_STORE_PATH)),
            severity: args.severity,
            default_severity: args.default_severity.unwrap_or(DEFAULT_SEVERITY),
            decay_rate: args.decay_rate.unwrap_or(DEFAULT_DECAY_RATE),
            distance_threshold_km: args
                .distance_threshold_km
                .unwrap_or(DEFAULT_DISTANCE_THRESHOLD_KM),
            policy,
            history,
            now,
        })
    }
}

fn parse_policy(value: &str) -> Result<ScoringPolicy, CliError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "mean-weight" => Ok(ScoringPolicy::MeanWeight),
        "total-weight" => Ok(ScoringPolicy::TotalWeight),
        _ => Err(CliError::InvalidChoice {
            field: ARG_SCORE_POLICY,
            value: value.to_owned(),
            expected: POLICY_CHOICES,
        }),
    }
}

fn parse_history(value: &str) -> Result<ReportHistory, CliError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "overwrite" => Ok(ReportHistory::Overwrite),
        "append" => Ok(ReportHistory::Append),
        _ => Err(CliError::InvalidChoice {
            field: ARG_SCORE_HISTORY,
            value: value.to_owned(),
            expected: HISTORY_CHOICES,
        }),
    }
}

fn parse_now(value: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| CliError::InvalidTimestamp {
            value: value.to_owned(),
            source,
        })
}

/// JSON document printed by `safestreets score`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScoreReport {
    /// Store the scored streets were written to.
    pub(crate) store: Utf8PathBuf,
    /// Street import counters; absent when the store was rescored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) street_import: Option<StreetImportStats>,
    pub(crate) crime_import: CrimeImportStats,
    pub(crate) summary: ScoringSummary,
}

pub(super) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_score_with(args, &mut stdout)
}

pub(super) fn run_score_with(args: ScoreArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let report = execute_score(args)?;
    write_json(writer, &report)
}

fn execute_score(args: ScoreArgs) -> Result<ScoreReport, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let scoring = config.scoring_config()?;

    let mut store = JsonStreetStore::new(config.store.clone());
    let (streets, street_import) = load_streets(config.streets.as_deref(), &store)?;
    let crimes = load_crimes_geojson(&config.crimes)?;
    info!(
        "scoring {} streets against {} crimes as of {}",
        streets.len(),
        crimes.stats.features,
        config.now
    );
    let summary = score_streets_into(&mut store, streets, &crimes.events, &scoring, config.now)?;

    Ok(ScoreReport {
        store: config.store,
        street_import,
        crime_import: crimes.stats,
        summary,
    })
}

fn load_streets(
    geojson: Option<&Utf8Path>,
    store: &JsonStreetStore,
) -> Result<(Vec<StreetPolygon>, Option<StreetImportStats>), CliError> {
    match geojson {
        Some(path) => {
            let import = load_streets_geojson(path)?;
            Ok((import.streets, Some(import.stats)))
        }
        None => Ok((store.load_streets()?, None)),
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ScoreConfig, CliError> {
    let merged = ScoreArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ScoreConfig::try_from(merged)
}
