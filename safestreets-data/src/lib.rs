//! Data access for the SafeStreets engine.
//!
//! Responsibilities:
//! - Decode street polygons and crime incidents from GeoJSON.
//! - Decode route requests and severity tables from JSON.
//! - Persist scored streets through [`JsonStreetStore`].
//!
//! Boundaries:
//! - Do not encode scoring rules (these live in `safestreets-scorer`).
//! - Malformed records are counted and skipped; only unreadable or
//!   structurally wrong documents are errors.
//!
//! Invariants:
//! - File access goes through `safestreets-fs`.
//! - No global mutable state.

#![forbid(unsafe_code)]

mod crimes;
mod error;
mod properties;
mod requests;
mod store;
mod streets;

use camino::Utf8Path;

pub use crimes::{CrimeImport, CrimeImportStats, load_crimes_geojson, parse_crimes_geojson};
pub use error::{DataError, FormatError};
pub use requests::{
    RouteRequest, load_route_request, load_severity_table, parse_route_request,
    parse_severity_table,
};
pub use store::JsonStreetStore;
pub use streets::{
    StreetImport, StreetImportStats, UNKNOWN_STREET, load_streets_geojson, parse_streets_geojson,
};

fn read_file(path: &Utf8Path) -> Result<String, DataError> {
    safestreets_fs::read_to_string(path).map_err(|source| DataError::Read {
        path: path.to_path_buf(),
        source,
    })
}
