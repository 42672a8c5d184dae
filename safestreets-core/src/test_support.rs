//! Test-only, in-memory street store and linear-scan lookup used by unit,
//! property and behaviour tests.

use std::convert::Infallible;

use geo::Coord;

use crate::geometry::{centroid, is_valid_coord, point_in_polygon};
use crate::index::{Candidate, StreetLookup, rank_candidates, search_envelope};
use crate::{StreetPolygon, StreetSink, StreetSource};

/// In-memory `StreetSource` and `StreetSink`.
#[derive(Default, Debug, Clone)]
pub struct MemoryStreetStore {
    streets: Vec<StreetPolygon>,
}

impl MemoryStreetStore {
    /// Create a store holding `streets`.
    pub fn with_streets<I>(streets: I) -> Self
    where
        I: IntoIterator<Item = StreetPolygon>,
    {
        Self {
            streets: streets.into_iter().collect(),
        }
    }

    /// The currently stored streets.
    #[must_use]
    pub fn streets(&self) -> &[StreetPolygon] {
        &self.streets
    }
}

impl StreetSource for MemoryStreetStore {
    type Error = Infallible;

    fn load_streets(&self) -> Result<Vec<StreetPolygon>, Self::Error> {
        Ok(self.streets.clone())
    }
}

impl StreetSink for MemoryStreetStore {
    type Error = Infallible;

    fn persist_streets(&mut self, streets: &[StreetPolygon]) -> Result<(), Self::Error> {
        self.streets = streets.to_vec();
        Ok(())
    }
}

/// `StreetLookup` that scans every street on each query.
///
/// The lookup is intended only for small datasets and for cross-checking
/// [`StreetIndex`](crate::StreetIndex).
#[derive(Debug, Clone)]
pub struct LinearStreetLookup {
    streets: Vec<StreetPolygon>,
    centroids: Vec<Option<Coord<f64>>>,
}

impl LinearStreetLookup {
    /// Wrap `streets`. Streets with invalid rings are never returned.
    #[must_use]
    pub fn new(streets: Vec<StreetPolygon>) -> Self {
        let centroids = streets
            .iter()
            .map(|s| {
                if s.has_valid_ring() {
                    centroid(s.ring())
                } else {
                    None
                }
            })
            .collect();
        Self { streets, centroids }
    }
}

impl StreetLookup for LinearStreetLookup {
    fn nearest_candidates(&self, point: Coord<f64>, radius_km: f64) -> Vec<Candidate<'_>> {
        if search_envelope(point, radius_km).is_none() {
            return Vec::new();
        }
        let hits = self
            .centroids
            .iter()
            .enumerate()
            .filter_map(|(position, c)| c.map(|centre| (position, centre)));
        rank_candidates(&self.streets, point, radius_km, hits)
    }

    fn containing(&self, point: Coord<f64>) -> Option<&StreetPolygon> {
        if !is_valid_coord(point) {
            return None;
        }
        self.streets
            .iter()
            .zip(&self.centroids)
            .find(|(street, c)| c.is_some() && point_in_polygon(point, street.ring()))
            .map(|(street, _)| street)
    }

    fn streets(&self) -> &[StreetPolygon] {
        &self.streets
    }
}

/// Axis-aligned square street with its south-west corner at
/// `(min_lon, min_lat)`.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "corner offsets are plain additions"
)]
pub fn square_street(id: &str, min_lon: f64, min_lat: f64, size: f64) -> StreetPolygon {
    StreetPolygon::new(
        id,
        format!("{id} Street"),
        vec![
            Coord {
                x: min_lon,
                y: min_lat,
            },
            Coord {
                x: min_lon,
                y: min_lat + size,
            },
            Coord {
                x: min_lon + size,
                y: min_lat + size,
            },
            Coord {
                x: min_lon + size,
                y: min_lat,
            },
        ],
    )
}
