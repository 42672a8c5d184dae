//! Route evaluation requests and severity tables stored as JSON.

use std::collections::BTreeMap;

use camino::Utf8Path;
use safestreets_core::Route;
use safestreets_scorer::SeverityTable;
use serde::{Deserialize, Serialize};

use crate::{DataError, FormatError, read_file};

/// Candidate routes submitted for evaluation.
///
/// Coordinates are `[latitude, longitude]` pairs, as returned by directions
/// services.
///
/// # Examples
/// ```
/// use safestreets_data::parse_route_request;
///
/// let request = parse_route_request(
///     r#"{"routes": [{"coordinates": [[38.9, -77.03], [38.91, -77.02]], "summary": "via K St"}]}"#,
/// )
/// .expect("valid request");
/// assert_eq!(request.routes[0].coordinates()[0].x, -77.03);
/// assert_eq!(request.routes[0].summary(), Some("via K St"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Routes in the order the caller supplied them.
    pub routes: Vec<Route>,
}

/// Parse a route request document.
///
/// # Errors
///
/// Returns [`FormatError::Json`] when the document does not match
/// [`RouteRequest`].
pub fn parse_route_request(document: &str) -> Result<RouteRequest, FormatError> {
    Ok(serde_json::from_str(document)?)
}

/// Read and parse a route request file.
///
/// # Errors
///
/// Returns [`DataError::Read`] when the file cannot be read and
/// [`DataError::Format`] when it is not a valid request.
pub fn load_route_request(path: &Utf8Path) -> Result<RouteRequest, DataError> {
    let contents = read_file(path)?;
    parse_route_request(&contents).map_err(|source| DataError::Format {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a JSON object mapping offense names to weights.
///
/// # Errors
///
/// Returns [`FormatError::Json`] when the document is not an object of
/// numbers and [`FormatError::Severity`] when a weight or `default_weight`
/// is negative or not finite.
///
/// # Examples
/// ```
/// use safestreets_data::parse_severity_table;
///
/// let table = parse_severity_table(r#"{"homicide": 12, "THEFT/OTHER": 2.5}"#, 1.0)
///     .expect("valid table");
/// assert_eq!(table.weight("HOMICIDE"), Some(12.0));
/// assert_eq!(table.weight_or_default("JAYWALKING"), 1.0);
/// ```
pub fn parse_severity_table(
    document: &str,
    default_weight: f64,
) -> Result<SeverityTable, FormatError> {
    let weights: BTreeMap<String, f64> = serde_json::from_str(document)?;
    Ok(SeverityTable::from_weights(weights, default_weight)?)
}

/// Read and parse a severity table file.
///
/// # Errors
///
/// Returns [`DataError::Read`] when the file cannot be read and
/// [`DataError::Format`] when it is not a valid table.
pub fn load_severity_table(
    path: &Utf8Path,
    default_weight: f64,
) -> Result<SeverityTable, DataError> {
    let contents = read_file(path)?;
    parse_severity_table(&contents, default_weight).map_err(|source| DataError::Format {
        path: path.to_path_buf(),
        source,
    })
}
