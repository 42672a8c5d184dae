//! R-tree entries referring back into the street collection by position.

use geo::Coord;
use rstar::{AABB, RTreeObject};

/// A street centroid keyed by the street's insertion position.
#[derive(Debug, Clone, Copy)]
pub(super) struct CentroidEntry {
    pub(super) position: usize,
    pub(super) centroid: Coord<f64>,
}

impl RTreeObject for CentroidEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.centroid.x, self.centroid.y])
    }
}

/// Bounding box of a street ring keyed by insertion position.
#[derive(Debug, Clone, Copy)]
pub(super) struct FootprintEntry {
    pub(super) position: usize,
    envelope: AABB<[f64; 2]>,
}

impl FootprintEntry {
    /// Build the bounding box of `ring`, or `None` when it is empty.
    pub(super) fn new(position: usize, ring: &[Coord<f64>]) -> Option<Self> {
        let (first, rest) = ring.split_first()?;
        let (min, max) = rest.iter().fold(
            ([first.x, first.y], [first.x, first.y]),
            |([min_x, min_y], [max_x, max_y]), c| {
                (
                    [min_x.min(c.x), min_y.min(c.y)],
                    [max_x.max(c.x), max_y.max(c.y)],
                )
            },
        );
        Some(Self {
            position,
            envelope: AABB::from_corners(min, max),
        })
    }
}

impl RTreeObject for FootprintEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}
