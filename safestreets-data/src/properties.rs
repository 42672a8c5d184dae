//! Helpers for reading GeoJSON feature collections and their properties.

use geo::Coord;
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};

use crate::FormatError;

/// Parse `text` as a GeoJSON FeatureCollection.
pub(crate) fn feature_collection(text: &str) -> Result<FeatureCollection, FormatError> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) | GeoJson::Geometry(_) => Err(FormatError::NotFeatureCollection),
    }
}

/// A property rendered as trimmed text.
///
/// Numbers are rendered in their JSON form; blank strings, `null` and other
/// JSON types count as missing.
pub(crate) fn text(properties: Option<&JsonObject>, key: &str) -> Option<String> {
    match properties?.get(key)? {
        JsonValue::String(value) => {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        JsonValue::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// The feature's own id, rendered as text.
pub(crate) fn feature_id(feature: &Feature) -> Option<String> {
    match feature.id.as_ref()? {
        geojson::feature::Id::String(id) => {
            let trimmed = id.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        }
        geojson::feature::Id::Number(id) => Some(id.to_string()),
    }
}

/// Convert a GeoJSON position into a coordinate.
///
/// Positions need at least longitude and latitude; altitude is ignored.
pub(crate) fn coord(position: &[f64]) -> Option<Coord<f64>> {
    match position {
        [x, y, ..] => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}
