//! Import crime events from a GeoJSON crime feed.

use camino::Utf8Path;
use geojson::{Feature, Value};
use log::{info, warn};
use safestreets_core::{CrimeContext, CrimeEvent};
use serde::Serialize;

use crate::properties::{coord, feature_collection, text};
use crate::{DataError, FormatError, read_file};

/// Counters describing a crime import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeImportStats {
    /// Features in the collection, each of which becomes one event.
    pub features: usize,
    /// Events without a usable point location.
    pub without_location: usize,
}

/// Crime events read from a GeoJSON document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrimeImport {
    /// Events in feature order.
    pub events: Vec<CrimeEvent>,
    /// What the import did.
    pub stats: CrimeImportStats,
}

/// Parse a GeoJSON FeatureCollection of crime incidents.
///
/// Every feature becomes a [`CrimeEvent`], even when fields are missing;
/// attribution counts and rejects incomplete events. Properties follow the
/// DC open data layout: `OFFENSE`, `REPORT_DAT`, `BLOCK`, `SHIFT` and
/// `METHOD`. A numeric `REPORT_DAT` is kept as epoch milliseconds.
///
/// # Errors
///
/// Returns [`FormatError`] when `document` is not a GeoJSON FeatureCollection.
///
/// # Examples
/// ```
/// use safestreets_data::parse_crimes_geojson;
///
/// let document = r#"{
///   "type": "FeatureCollection",
///   "features": [{
///     "type": "Feature",
///     "properties": { "OFFENSE": "ROBBERY", "REPORT_DAT": 1705343400000, "SHIFT": "EVENING" },
///     "geometry": { "type": "Point", "coordinates": [-77.03, 38.9] }
///   }]
/// }"#;
/// let import = parse_crimes_geojson(document).expect("valid GeoJSON");
/// let event = &import.events[0];
/// assert_eq!(event.offense.as_deref(), Some("ROBBERY"));
/// assert_eq!(event.reported_at.as_deref(), Some("1705343400000"));
/// assert_eq!(event.context.shift.as_deref(), Some("EVENING"));
/// ```
pub fn parse_crimes_geojson(document: &str) -> Result<CrimeImport, FormatError> {
    let collection = feature_collection(document)?;
    let events: Vec<CrimeEvent> = collection.features.iter().map(crime_event).collect();
    let stats = CrimeImportStats {
        features: events.len(),
        without_location: events.iter().filter(|e| e.location.is_none()).count(),
    };
    if stats.without_location > 0 {
        warn!(
            "{} of {} crime features have no point geometry",
            stats.without_location, stats.features
        );
    }
    info!("read {} crime events", stats.features);
    Ok(CrimeImport { events, stats })
}

/// Read and parse a crime GeoJSON file.
///
/// # Errors
///
/// Returns [`DataError::Read`] when the file cannot be read and
/// [`DataError::Format`] when its contents are not a FeatureCollection.
pub fn load_crimes_geojson(path: &Utf8Path) -> Result<CrimeImport, DataError> {
    let contents = read_file(path)?;
    parse_crimes_geojson(&contents).map_err(|source| DataError::Format {
        path: path.to_path_buf(),
        source,
    })
}

fn crime_event(feature: &Feature) -> CrimeEvent {
    let location = feature.geometry.as_ref().and_then(|geometry| match &geometry.value {
        Value::Point(position) => coord(position),
        _ => None,
    });
    let properties = feature.properties.as_ref();
    CrimeEvent::new(
        location,
        text(properties, "OFFENSE"),
        text(properties, "REPORT_DAT"),
    )
    .with_context(CrimeContext {
        block: text(properties, "BLOCK"),
        shift: text(properties, "SHIFT"),
        method: text(properties, "METHOD"),
    })
}
