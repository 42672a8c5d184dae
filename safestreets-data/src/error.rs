//! Errors raised while reading or writing SafeStreets data files.

use std::io;

use camino::Utf8PathBuf;
use safestreets_scorer::AttributionConfigError;
use thiserror::Error;

/// A document could not be decoded into SafeStreets records.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The text was not GeoJSON.
    #[error("invalid GeoJSON")]
    GeoJson(#[source] Box<geojson::Error>),
    /// The GeoJSON was a bare geometry or feature.
    #[error("expected a GeoJSON FeatureCollection")]
    NotFeatureCollection,
    /// The text was not the expected JSON shape.
    #[error("invalid JSON")]
    Json(#[from] serde_json::Error),
    /// A severity table held an unusable weight.
    #[error("invalid severity table")]
    Severity(#[from] AttributionConfigError),
}

impl From<geojson::Error> for FormatError {
    fn from(err: geojson::Error) -> Self {
        Self::GeoJson(Box::new(err))
    }
}

/// Errors returned by the file-backed loaders and [`JsonStreetStore`](crate::JsonStreetStore).
#[derive(Debug, Error)]
pub enum DataError {
    /// The file could not be read.
    #[error("failed to read {path}")]
    Read {
        /// File that was read.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The file could not be written.
    #[error("failed to write {path}")]
    Write {
        /// File that was written.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// The file was read but its contents were unusable.
    #[error("failed to decode {path}")]
    Format {
        /// File whose contents were rejected.
        path: Utf8PathBuf,
        /// Decoding failure.
        #[source]
        source: FormatError,
    },
}
