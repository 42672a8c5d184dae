//! Error types emitted by the SafeStreets CLI.
//!
//! Keep this error type reasonably small, as every CLI helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use safestreets_core::StreetIndexError;
use safestreets_data::DataError;
use safestreets_routes::RouteEvaluatorConfigError;
use safestreets_scorer::{AttributionConfigError, ScoringError};
use thiserror::Error;

/// Errors emitted by the SafeStreets CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag that was not supplied.
        field: &'static str,
        /// Environment variable that can supply it instead.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// An option only accepts a fixed set of values.
    #[error("invalid {field} {value:?}; expected one of {expected}")]
    InvalidChoice {
        /// Flag that was supplied.
        field: &'static str,
        /// Rejected value.
        value: String,
        /// Accepted values, comma separated.
        expected: &'static str,
    },
    /// The reference time was not an RFC 3339 timestamp.
    #[error("invalid --now timestamp {value:?}: {source}")]
    InvalidTimestamp {
        /// Rejected value.
        value: String,
        /// Parser failure.
        #[source]
        source: chrono::ParseError,
    },
    /// Severity, decay or distance settings were rejected.
    #[error(transparent)]
    Attribution(#[from] AttributionConfigError),
    /// Route evaluator settings were rejected.
    #[error(transparent)]
    Evaluator(#[from] RouteEvaluatorConfigError),
    /// Reading or writing a data file failed.
    #[error(transparent)]
    Data(#[from] DataError),
    /// The scoring pass failed.
    #[error("scoring failed: {0}")]
    Scoring(#[from] ScoringError),
    /// Stored streets could not be indexed for route matching.
    #[error("failed to index stored streets: {0}")]
    Index(#[from] StreetIndexError),
    /// Serializing the command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing the command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
