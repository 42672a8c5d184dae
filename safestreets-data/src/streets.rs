//! Import street polygons from GeoJSON.

use std::collections::HashSet;

use camino::Utf8Path;
use geo::Coord;
use geojson::{Feature, JsonObject, Value};
use log::{debug, info, warn};
use safestreets_core::{CrimeReport, SafetyScore, StreetId, StreetPolygon};
use serde::Serialize;

use crate::properties::{coord, feature_collection, feature_id, text};
use crate::{DataError, FormatError, read_file};

/// Name given to features without a usable `STREETNAME`.
pub const UNKNOWN_STREET: &str = "Unknown Street";

/// Counters describing a street import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreetImportStats {
    /// Features in the collection.
    pub features: usize,
    /// Features turned into streets.
    pub imported: usize,
    /// Features skipped because they were not usable polygons.
    pub skipped_geometry: usize,
    /// Imported streets named [`UNKNOWN_STREET`].
    pub unknown_names: usize,
    /// Imported streets that carried a prior score or report history.
    pub restored_history: usize,
    /// Features skipped because an earlier feature already used their id.
    pub duplicate_ids: usize,
}

/// Streets read from a GeoJSON document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreetImport {
    /// Imported streets in feature order.
    pub streets: Vec<StreetPolygon>,
    /// What the import did.
    pub stats: StreetImportStats,
}

/// Parse a GeoJSON FeatureCollection of street polygons.
///
/// Only `Polygon` features are imported, using their outer ring. Street ids
/// come from the feature id, then the `OBJECTID` property, then
/// `feature-{position}` for the feature's position in the collection. A
/// feature whose id was already taken is skipped and counted. Optional `safetyScore` and `reports`
/// properties restore state written by an earlier scoring pass.
///
/// # Errors
///
/// Returns [`FormatError`] when `document` is not a GeoJSON FeatureCollection.
///
/// # Examples
/// ```
/// use safestreets_data::parse_streets_geojson;
///
/// let text = r#"{
///   "type": "FeatureCollection",
///   "features": [{
///     "type": "Feature",
///     "properties": { "OBJECTID": 7, "STREETNAME": " K ST NW " },
///     "geometry": { "type": "Polygon", "coordinates": [[[0,0],[0,1],[1,1],[1,0],[0,0]]] }
///   }]
/// }"#;
/// let import = parse_streets_geojson(text).expect("valid GeoJSON");
/// let street = &import.streets[0];
/// assert_eq!(street.id().as_str(), "7");
/// assert_eq!(street.name(), "K ST NW");
/// assert_eq!(street.ring().len(), 4);
/// ```
pub fn parse_streets_geojson(document: &str) -> Result<StreetImport, FormatError> {
    let collection = feature_collection(document)?;
    let mut import = StreetImport::default();
    import.stats.features = collection.features.len();
    let mut seen = HashSet::new();

    for (position, feature) in collection.features.iter().enumerate() {
        let Some(ring) = outer_ring(feature) else {
            debug!("skipping street feature {position}: not a usable polygon");
            import.stats.skipped_geometry += 1;
            continue;
        };
        let properties = feature.properties.as_ref();
        let id = feature_id(feature)
            .or_else(|| text(properties, "OBJECTID"))
            .map_or_else(|| StreetId::new(format!("feature-{position}")), StreetId::new);
        if !seen.insert(id.clone()) {
            debug!("skipping street feature {position}: id {id} already imported");
            import.stats.duplicate_ids += 1;
            continue;
        }
        let name = text(properties, "STREETNAME").unwrap_or_else(|| {
            import.stats.unknown_names += 1;
            UNKNOWN_STREET.to_owned()
        });

        let mut street = StreetPolygon::new(id, name, ring);
        if let Some((score, reports)) = prior_history(properties) {
            street = street.with_history(score, reports);
            import.stats.restored_history += 1;
        }
        import.streets.push(street);
        import.stats.imported += 1;
    }

    if import.stats.duplicate_ids > 0 {
        warn!(
            "skipped {} street features whose id was already imported",
            import.stats.duplicate_ids
        );
    }
    if import.stats.skipped_geometry > 0 {
        warn!(
            "skipped {} of {} street features without polygon geometry",
            import.stats.skipped_geometry, import.stats.features
        );
    }
    info!(
        "imported {} streets ({} unnamed)",
        import.stats.imported, import.stats.unknown_names
    );
    Ok(import)
}

/// Read and parse a street GeoJSON file.
///
/// # Errors
///
/// Returns [`DataError::Read`] when the file cannot be read and
/// [`DataError::Format`] when its contents are not a FeatureCollection.
pub fn load_streets_geojson(path: &Utf8Path) -> Result<StreetImport, DataError> {
    let contents = read_file(path)?;
    parse_streets_geojson(&contents).map_err(|source| DataError::Format {
        path: path.to_path_buf(),
        source,
    })
}

/// Outer ring of a polygon feature without its closing vertex.
fn outer_ring(feature: &Feature) -> Option<Vec<Coord<f64>>> {
    let Value::Polygon(rings) = &feature.geometry.as_ref()?.value else {
        return None;
    };
    let mut ring = rings
        .first()?
        .iter()
        .map(|position| coord(position))
        .collect::<Option<Vec<_>>>()?;
    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    Some(ring)
}

/// Score and reports stored on a feature by an earlier export.
fn prior_history(properties: Option<&JsonObject>) -> Option<(SafetyScore, Vec<CrimeReport>)> {
    let properties = properties?;
    let score = properties.get("safetyScore").and_then(serde_json::Value::as_f64);
    let reports = properties.get("reports").and_then(|value| {
        serde_json::from_value::<Vec<CrimeReport>>(value.clone())
            .inspect_err(|err| warn!("ignoring unreadable report history: {err}"))
            .ok()
    });
    if score.is_none() && reports.is_none() {
        return None;
    }
    Some((
        score.map_or_else(SafetyScore::default, SafetyScore::new),
        reports.unwrap_or_default(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn collection(features: &str) -> String {
        format!(r#"{{"type": "FeatureCollection", "features": [{features}]}}"#)
    }

    const SQUARE: &str = r#"{"type": "Polygon", "coordinates": [[[0,0],[0,1],[1,1],[1,0],[0,0]]]}"#;

    #[rstest]
    fn non_polygon_features_are_counted_and_skipped() {
        let text = collection(&format!(
            r#"{{"type": "Feature", "properties": {{}}, "geometry": {{"type": "Point", "coordinates": [0, 0]}}}},
               {{"type": "Feature", "properties": {{}}, "geometry": null}},
               {{"type": "Feature", "properties": {{"STREETNAME": "A ST"}}, "geometry": {SQUARE}}}"#
        ));
        let import = parse_streets_geojson(&text).expect("valid collection");
        assert_eq!(import.stats.features, 3);
        assert_eq!(import.stats.skipped_geometry, 2);
        assert_eq!(import.stats.imported, 1);
        let street = import.streets.first().expect("one street");
        assert_eq!(street.id().as_str(), "feature-2");
    }

    #[rstest]
    #[case(r#""id": "seg-1", "properties": {"OBJECTID": 5}"#, "seg-1")]
    #[case(r#""id": 9, "properties": {"OBJECTID": 5}"#, "9")]
    #[case(r#""properties": {"OBJECTID": 5}"#, "5")]
    #[case(r#""properties": null"#, "feature-0")]
    fn street_ids_fall_back_in_order(#[case] fields: &str, #[case] expected: &str) {
        let text = collection(&format!(r#"{{"type": "Feature", {fields}, "geometry": {SQUARE}}}"#));
        let import = parse_streets_geojson(&text).expect("valid collection");
        let street = import.streets.first().expect("one street");
        assert_eq!(street.id().as_str(), expected);
    }

    #[rstest]
    #[case::positional_and_numeric(
        r#"{"type": "Feature", "properties": {"STREETNAME": "A ST"}, "geometry": SQUARE},
           {"type": "Feature", "properties": {"OBJECTID": 0, "STREETNAME": "B ST"}, "geometry": SQUARE}"#,
        &["feature-0", "0"],
        0
    )]
    #[case::repeated_objectid(
        r#"{"type": "Feature", "properties": {"OBJECTID": 4, "STREETNAME": "A ST"}, "geometry": SQUARE},
           {"type": "Feature", "properties": {"OBJECTID": 4, "STREETNAME": "B ST"}, "geometry": SQUARE}"#,
        &["4"],
        1
    )]
    fn street_ids_stay_unique(
        #[case] features: &str,
        #[case] expected: &[&str],
        #[case] duplicates: usize,
    ) {
        let text = collection(&features.replace("SQUARE", SQUARE));
        let import = parse_streets_geojson(&text).expect("valid collection");
        let ids: Vec<&str> = import.streets.iter().map(|s| s.id().as_str()).collect();
        assert_eq!(ids, expected);
        assert_eq!(import.stats.duplicate_ids, duplicates);
        assert_eq!(import.stats.imported, expected.len());
        assert!(safestreets_core::StreetIndex::build(import.streets).is_ok());
    }

    #[rstest]
    #[case(r#"{"STREETNAME": "   "}"#)]
    #[case(r#"{"STREETNAME": null}"#)]
    #[case("{}")]
    fn missing_names_become_unknown(#[case] properties: &str) {
        let text = collection(&format!(
            r#"{{"type": "Feature", "properties": {properties}, "geometry": {SQUARE}}}"#
        ));
        let import = parse_streets_geojson(&text).expect("valid collection");
        let street = import.streets.first().expect("one street");
        assert_eq!(street.name(), UNKNOWN_STREET);
        assert_eq!(import.stats.unknown_names, 1);
    }

    #[rstest]
    fn prior_scores_and_reports_are_restored() {
        let properties = r#"{
            "STREETNAME": "B ST",
            "safetyScore": 4.5,
            "reports": [{
                "offense": "ROBBERY",
                "reportedAt": "2024-01-01T00:00:00Z",
                "block": "100 BLOCK OF B ST",
                "distanceKm": 0.02,
                "baseWeight": 8.0,
                "recencyMultiplier": 1.0,
                "finalWeight": 8.0
            }]
        }"#;
        let text = collection(&format!(
            r#"{{"type": "Feature", "properties": {properties}, "geometry": {SQUARE}}}"#
        ));
        let import = parse_streets_geojson(&text).expect("valid collection");
        let street = import.streets.first().expect("one street");
        assert_eq!(street.safety_score().value(), 4.5);
        assert_eq!(street.reports().len(), 1);
        assert_eq!(import.stats.restored_history, 1);
        let block = street
            .reports()
            .first()
            .and_then(|r| r.context.block.as_deref());
        assert_eq!(block, Some("100 BLOCK OF B ST"));
    }

    #[rstest]
    fn closing_vertex_is_dropped() {
        let text = collection(&format!(r#"{{"type": "Feature", "properties": {{}}, "geometry": {SQUARE}}}"#));
        let import = parse_streets_geojson(&text).expect("valid collection");
        let ring = import.streets.first().map(StreetPolygon::ring).unwrap_or_default();
        assert_eq!(ring.len(), 4);
    }
}
