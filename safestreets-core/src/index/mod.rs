//! Spatial lookups over street polygons.
//!
//! [`StreetIndex`] is built once from a street collection and answers two
//! questions: which streets have a centroid within some distance of a point
//! (used when attributing crimes), and which street contains a point (used
//! when sampling routes). Both queries are backed by R\*-trees from `rstar`
//! and never mutate the index, so a single index can be shared across
//! threads.

mod entries;

use std::collections::HashSet;

use geo::Coord;
use log::{debug, warn};
use rstar::{AABB, RTree};
use thiserror::Error;

use crate::StreetPolygon;
use crate::geometry::{EARTH_RADIUS_KM, centroid, distance_km, is_valid_coord, point_in_polygon};
use entries::{CentroidEntry, FootprintEntry};

/// A street whose centroid lies within a search radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<'a> {
    /// The matching street.
    pub street: &'a StreetPolygon,
    /// Great-circle distance from the query point to the street centroid.
    pub distance_km: f64,
}

/// Read-only spatial queries over a street collection.
///
/// Implementations must be thread-safe and deterministic: equal inputs give
/// equal outputs in the same order.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use safestreets_core::{StreetIndex, StreetLookup, StreetPolygon};
///
/// # fn main() -> Result<(), safestreets_core::StreetIndexError> {
/// let square = vec![
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 0.0, y: 0.001 },
///     Coord { x: 0.001, y: 0.001 },
///     Coord { x: 0.001, y: 0.0 },
/// ];
/// let index = StreetIndex::build(vec![StreetPolygon::new("1", "A St", square)])?;
/// let point = Coord { x: 0.0005, y: 0.0005 };
/// assert_eq!(index.nearest_candidates(point, 0.1).len(), 1);
/// assert!(index.containing(point).is_some());
/// assert!(index.containing(Coord { x: 1.0, y: 1.0 }).is_none());
/// # Ok(())
/// # }
/// ```
pub trait StreetLookup: Send + Sync {
    /// Streets with a centroid at most `radius_km` from `point`, nearest
    /// first. Ties keep insertion order.
    fn nearest_candidates(&self, point: Coord<f64>, radius_km: f64) -> Vec<Candidate<'_>>;

    /// The first street, in insertion order, whose ring contains `point`.
    fn containing(&self, point: Coord<f64>) -> Option<&StreetPolygon>;

    /// Every street known to the lookup, including ones skipped for invalid
    /// geometry.
    fn streets(&self) -> &[StreetPolygon];
}

/// Errors raised while building a [`StreetIndex`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StreetIndexError {
    /// No streets were supplied.
    #[error("street collection is empty")]
    Empty,
    /// Every street had an unusable ring.
    #[error("none of the {skipped} streets has a valid polygon ring")]
    NoValidPolygons {
        /// Number of streets rejected.
        skipped: usize,
    },
    /// Two streets share an identifier.
    #[error("street id {id} appears more than once")]
    DuplicateId {
        /// The repeated identifier.
        id: String,
    },
}

/// Immutable spatial index over a street collection.
///
/// Streets with invalid rings stay in the collection but are left out of both
/// trees, so they are never returned by a query.
#[derive(Debug)]
pub struct StreetIndex {
    streets: Vec<StreetPolygon>,
    centroids: RTree<CentroidEntry>,
    footprints: RTree<FootprintEntry>,
    skipped: usize,
}

impl StreetIndex {
    /// Build an index over `streets`.
    ///
    /// # Errors
    ///
    /// Returns [`StreetIndexError::Empty`] for an empty collection,
    /// [`StreetIndexError::DuplicateId`] when identifiers repeat, and
    /// [`StreetIndexError::NoValidPolygons`] when no ring is usable.
    pub fn build(streets: Vec<StreetPolygon>) -> Result<Self, StreetIndexError> {
        if streets.is_empty() {
            return Err(StreetIndexError::Empty);
        }
        ensure_unique_ids(&streets)?;

        let mut centroid_entries = Vec::with_capacity(streets.len());
        let mut footprint_entries = Vec::with_capacity(streets.len());
        for (position, street) in streets.iter().enumerate() {
            let Some((centre, footprint)) = indexable(position, street) else {
                debug!("skipping street {} with an invalid ring", street.id());
                continue;
            };
            centroid_entries.push(CentroidEntry {
                position,
                centroid: centre,
            });
            footprint_entries.push(footprint);
        }

        let skipped = streets.len() - centroid_entries.len();
        if centroid_entries.is_empty() {
            return Err(StreetIndexError::NoValidPolygons { skipped });
        }
        if skipped > 0 {
            warn!("skipped {skipped} of {} streets with invalid rings", streets.len());
        }

        Ok(Self {
            streets,
            centroids: RTree::bulk_load(centroid_entries),
            footprints: RTree::bulk_load(footprint_entries),
            skipped,
        })
    }

    /// Number of streets in the collection, indexed or not.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.streets.len()
    }

    /// Whether the collection is empty. Always `false` for a built index.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.streets.is_empty()
    }

    /// Number of streets left out of the trees because of invalid rings.
    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Release the street collection in its original order.
    #[must_use]
    pub fn into_streets(self) -> Vec<StreetPolygon> {
        self.streets
    }
}

impl StreetLookup for StreetIndex {
    fn nearest_candidates(&self, point: Coord<f64>, radius_km: f64) -> Vec<Candidate<'_>> {
        let Some(envelope) = search_envelope(point, radius_km) else {
            return Vec::new();
        };
        let hits = self
            .centroids
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| (entry.position, entry.centroid));
        rank_candidates(&self.streets, point, radius_km, hits)
    }

    fn containing(&self, point: Coord<f64>) -> Option<&StreetPolygon> {
        if !is_valid_coord(point) {
            return None;
        }
        let envelope = AABB::from_point([point.x, point.y]);
        self.footprints
            .locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.position)
            .filter_map(|position| self.streets.get(position).map(|s| (position, s)))
            .filter(|(_, street)| point_in_polygon(point, street.ring()))
            .min_by_key(|(position, _)| *position)
            .map(|(_, street)| street)
    }

    fn streets(&self) -> &[StreetPolygon] {
        &self.streets
    }
}

fn ensure_unique_ids(streets: &[StreetPolygon]) -> Result<(), StreetIndexError> {
    let mut seen = HashSet::with_capacity(streets.len());
    for street in streets {
        if !seen.insert(street.id()) {
            return Err(StreetIndexError::DuplicateId {
                id: street.id().to_string(),
            });
        }
    }
    Ok(())
}

fn indexable(position: usize, street: &StreetPolygon) -> Option<(Coord<f64>, FootprintEntry)> {
    if !street.has_valid_ring() {
        return None;
    }
    let centre = centroid(street.ring())?;
    let footprint = FootprintEntry::new(position, street.ring())?;
    Some((centre, footprint))
}

/// Filter `(position, centroid)` hits to those within `radius_km` and order
/// them by distance, then position.
pub(crate) fn rank_candidates<'a, I>(
    streets: &'a [StreetPolygon],
    point: Coord<f64>,
    radius_km: f64,
    hits: I,
) -> Vec<Candidate<'a>>
where
    I: IntoIterator<Item = (usize, Coord<f64>)>,
{
    let mut ranked: Vec<(usize, f64)> = hits
        .into_iter()
        .map(|(position, centre)| (position, distance_km(point, centre)))
        .filter(|&(_, distance)| distance <= radius_km)
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .filter_map(|(position, distance)| {
            streets.get(position).map(|street| Candidate {
                street,
                distance_km: distance,
            })
        })
        .collect()
}

/// Degree-space box guaranteed to contain every point within `radius_km` of
/// `point` on the sphere. Returns `None` for unusable queries.
///
/// The longitude span of a spherical cap of angular radius `d` centred at
/// latitude `phi` is `asin(sin d / cos phi)`. Caps reaching a pole or the
/// antimeridian widen to the full longitude range.
#[expect(
    clippy::float_arithmetic,
    reason = "envelope bounds derive from spherical trigonometry"
)]
pub(crate) fn search_envelope(point: Coord<f64>, radius_km: f64) -> Option<AABB<[f64; 2]>> {
    if !is_valid_coord(point) || !radius_km.is_finite() || radius_km < 0.0 {
        return None;
    }
    let angular = radius_km / EARTH_RADIUS_KM;
    let lat_delta = angular.to_degrees();
    let min_lat = point.y - lat_delta;
    let max_lat = point.y + lat_delta;
    let full = (-180.0, 180.0);

    let (min_lon, max_lon) = if min_lat <= -90.0 || max_lat >= 90.0 {
        full
    } else {
        let cos_lat = point.y.to_radians().cos();
        let ratio = angular.sin() / cos_lat;
        if angular >= std::f64::consts::FRAC_PI_2 || ratio >= 1.0 {
            full
        } else {
            let lon_delta = ratio.asin().to_degrees();
            let (west, east) = (point.x - lon_delta, point.x + lon_delta);
            if west < -180.0 || east > 180.0 {
                full
            } else {
                (west, east)
            }
        }
    };

    Some(AABB::from_corners(
        [min_lon, min_lat.max(-90.0)],
        [max_lon, max_lat.min(90.0)],
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn square(id: &str, min_x: f64, min_y: f64, size: f64) -> StreetPolygon {
        StreetPolygon::new(
            id,
            format!("{id} St"),
            vec![
                Coord { x: min_x, y: min_y },
                Coord {
                    x: min_x,
                    y: min_y + size,
                },
                Coord {
                    x: min_x + size,
                    y: min_y + size,
                },
                Coord {
                    x: min_x + size,
                    y: min_y,
                },
            ],
        )
    }

    #[fixture]
    fn index() -> StreetIndex {
        StreetIndex::build(vec![
            square("a", 0.0, 0.0, 0.001),
            square("b", 0.002, 0.0, 0.001),
            square("broken", f64::NAN, 0.0, 0.001),
        ])
        .expect("index builds")
    }

    #[rstest]
    fn empty_collection_is_rejected() {
        assert_eq!(
            StreetIndex::build(Vec::new()).err(),
            Some(StreetIndexError::Empty)
        );
    }

    #[rstest]
    fn all_invalid_rings_are_rejected() {
        let streets = vec![StreetPolygon::new("x", "X St", Vec::new())];
        assert_eq!(
            StreetIndex::build(streets).err(),
            Some(StreetIndexError::NoValidPolygons { skipped: 1 })
        );
    }

    #[rstest]
    fn duplicate_ids_are_rejected() {
        let streets = vec![square("a", 0.0, 0.0, 0.001), square("a", 1.0, 1.0, 0.001)];
        assert_eq!(
            StreetIndex::build(streets).err(),
            Some(StreetIndexError::DuplicateId { id: "a".into() })
        );
    }

    #[rstest]
    fn invalid_streets_are_kept_but_not_indexed(index: StreetIndex) {
        assert_eq!(index.len(), 3);
        assert_eq!(index.skipped(), 1);
        let everything = index.nearest_candidates(Coord { x: 0.001, y: 0.0005 }, 50.0);
        assert_eq!(everything.len(), 2);
    }

    #[rstest]
    fn candidates_are_sorted_by_distance(index: StreetIndex) {
        let near_b = Coord { x: 0.0026, y: 0.0005 };
        let ids: Vec<&str> = index
            .nearest_candidates(near_b, 1.0)
            .iter()
            .map(|c| c.street.id().as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[rstest]
    fn equidistant_candidates_keep_insertion_order() {
        let index = StreetIndex::build(vec![
            square("twin-b", 0.0, 0.0, 0.001),
            square("twin-a", 0.0, 0.0, 0.001),
        ])
        .expect("index builds");
        let ids: Vec<&str> = index
            .nearest_candidates(Coord { x: 0.003, y: 0.003 }, 1.0)
            .iter()
            .map(|c| c.street.id().as_str())
            .collect();
        assert_eq!(ids, vec!["twin-b", "twin-a"]);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    fn unusable_radius_finds_nothing(index: StreetIndex, #[case] radius: f64) {
        assert!(index.nearest_candidates(Coord { x: 0.0, y: 0.0 }, radius).is_empty());
    }

    #[rstest]
    fn overlapping_polygons_resolve_to_first_inserted() {
        let index = StreetIndex::build(vec![
            square("first", 0.0, 0.0, 0.002),
            square("second", 0.001, 0.001, 0.002),
        ])
        .expect("index builds");
        let overlap = Coord { x: 0.0015, y: 0.0015 };
        let found = index.containing(overlap).map(|s| s.id().as_str());
        assert_eq!(found, Some("first"));
    }

    #[rstest]
    fn envelope_near_pole_spans_all_longitudes() {
        let envelope = search_envelope(Coord { x: 10.0, y: 89.99 }, 5.0).expect("envelope");
        assert_eq!(envelope.lower()[0], -180.0);
        assert_eq!(envelope.upper()[0], 180.0);
    }

    #[rstest]
    fn envelope_across_antimeridian_spans_all_longitudes() {
        let envelope = search_envelope(Coord { x: 179.99, y: 0.0 }, 5.0).expect("envelope");
        assert_eq!(envelope.lower()[0], -180.0);
    }
}
