//! Command-line interface for scoring streets and ranking walking routes.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod route;
mod score;

pub use error::CliError;
use route::{RouteArgs, run_route};
use score::{ScoreArgs, run_score};

const ARG_SCORE_STREETS: &str = "streets";
const ARG_SCORE_CRIMES: &str = "crimes";
const ARG_SCORE_SEVERITY: &str = "severity";
const ARG_SCORE_DEFAULT_SEVERITY: &str = "default-severity";
const ARG_SCORE_DECAY_RATE: &str = "decay-rate";
const ARG_SCORE_DISTANCE_THRESHOLD: &str = "distance-threshold-km";
const ARG_SCORE_POLICY: &str = "policy";
const ARG_SCORE_HISTORY: &str = "history";
const ARG_SCORE_NOW: &str = "now";
const ARG_STORE: &str = "store";
const ARG_ROUTE_REQUEST: &str = "request";
const ARG_ROUTE_DEFAULT_SCORE: &str = "default-point-score";
const ARG_ROUTE_WALKING_SPEED: &str = "walking-speed-kmh";
const ENV_SCORE_CRIMES: &str = "SAFESTREETS_CMDS_SCORE_CRIMES";
const ENV_ROUTE_REQUEST: &str = "SAFESTREETS_CMDS_ROUTE_REQUEST_PATH";

/// Store file used when `--store` is not supplied.
const DEFAULT_STORE_PATH: &str = "streets.json";

/// Run the SafeStreets CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments fail to parse, configuration cannot be
/// resolved, inputs cannot be read, or the command itself fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Score(args) => run_score(args),
        Command::Route(args) => run_route(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "safestreets",
    about = "Score streets by nearby crime and rank walking routes by safety",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Attribute crimes to streets and persist the rescored collection.
    Score(ScoreArgs),
    /// Rank candidate routes against the scored street store.
    Route(RouteArgs),
}

fn require_existing(path: &camino::Utf8Path, field: &'static str) -> Result<(), CliError> {
    match safestreets_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_json<T>(writer: &mut dyn std::io::Write, value: &T) -> Result<(), CliError>
where
    T: serde::Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
