//! Planar and spherical helpers shared by the scorer and the route evaluator.
//!
//! All coordinates are WGS84 with `x = longitude` and `y = latitude`. The
//! functions are pure and never allocate beyond the polygon built for
//! [`centroid`].

use geo::{Centroid, Coord, LineString, Polygon};

/// Mean Earth radius used by [`distance_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometres.
///
/// Uses the haversine formula with a fixed radius of [`EARTH_RADIUS_KM`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use safestreets_core::geometry::distance_km;
///
/// let origin = Coord { x: 0.0, y: 0.0 };
/// let north = Coord { x: 0.0, y: 1.0 };
/// let km = distance_km(origin, north);
/// assert!((km - 111.19).abs() < 0.01);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "haversine is defined over floating point trigonometry"
)]
pub fn distance_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat_a = a.y.to_radians();
    let lat_b = b.y.to_radians();
    let half_dlat = (b.y - a.y).to_radians() / 2.0;
    let half_dlon = (b.x - a.x).to_radians() / 2.0;
    let h = half_dlat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_dlon.sin().powi(2);
    // Rounding can push `h` fractionally past 1 for antipodal points.
    let h_clamped = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h_clamped.sqrt().atan2((1.0 - h_clamped).sqrt())
}

/// Centroid of a polygon ring.
///
/// The area-weighted centroid is used when the ring encloses an area. Rings
/// with zero area fall back to the mean of their vertices. Returns `None` for
/// an empty ring.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use safestreets_core::geometry::centroid;
///
/// let ring = [
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 2.0, y: 0.0 },
///     Coord { x: 2.0, y: 2.0 },
///     Coord { x: 0.0, y: 2.0 },
/// ];
/// let middle = centroid(&ring).expect("ring is not empty");
/// assert!((middle.x - 1.0).abs() < 1e-9 && (middle.y - 1.0).abs() < 1e-9);
/// assert_eq!(centroid(&[]), None);
/// ```
#[must_use]
pub fn centroid(ring: &[Coord<f64>]) -> Option<Coord<f64>> {
    if ring.is_empty() {
        return None;
    }
    let polygon = Polygon::new(LineString::from(ring.to_vec()), Vec::new());
    polygon
        .centroid()
        .map(|point| point.0)
        .or_else(|| vertex_mean(ring))
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "vertex counts stay far below 2^52"
)]
fn vertex_mean(ring: &[Coord<f64>]) -> Option<Coord<f64>> {
    if ring.is_empty() {
        return None;
    }
    let count = ring.len() as f64;
    let sum = ring
        .iter()
        .fold(Coord { x: 0.0, y: 0.0 }, |acc, c| Coord {
            x: acc.x + c.x,
            y: acc.y + c.y,
        });
    Some(Coord {
        x: sum.x / count,
        y: sum.y / count,
    })
}

/// Test whether `point` lies inside the polygon described by `ring`.
///
/// Ray casting with the half-open crossing rule: an edge counts when exactly
/// one endpoint lies strictly above the point, and the crossing must lie
/// strictly to the right of it. Consequently points on a left or bottom edge
/// are inside and points on a right or top edge are outside. The ring may be
/// open or closed. Rings with fewer than three vertices contain nothing.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use safestreets_core::geometry::point_in_polygon;
///
/// let square = [
///     Coord { x: 0.0, y: 0.0 },
///     Coord { x: 0.0, y: 1.0 },
///     Coord { x: 1.0, y: 1.0 },
///     Coord { x: 1.0, y: 0.0 },
/// ];
/// assert!(point_in_polygon(Coord { x: 0.5, y: 0.5 }, &square));
/// assert!(point_in_polygon(Coord { x: 0.0, y: 0.5 }, &square));
/// assert!(!point_in_polygon(Coord { x: 1.0, y: 0.5 }, &square));
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "edge intersection requires floating point interpolation"
)]
pub fn point_in_polygon(point: Coord<f64>, ring: &[Coord<f64>]) -> bool {
    let Some(&last) = ring.last() else {
        return false;
    };
    if ring.len() < 3 {
        return false;
    }
    let previous = std::iter::once(last).chain(ring.iter().copied());
    ring.iter()
        .copied()
        .zip(previous)
        .filter(|&(current, prior)| {
            (current.y > point.y) != (prior.y > point.y)
                && point.x
                    < (prior.x - current.x) * (point.y - current.y) / (prior.y - current.y)
                        + current.x
        })
        .fold(false, |inside, _| !inside)
}

/// Check that a coordinate is finite and within WGS84 bounds.
#[must_use]
pub fn is_valid_coord(coord: Coord<f64>) -> bool {
    coord.x.is_finite()
        && coord.y.is_finite()
        && (-180.0..=180.0).contains(&coord.x)
        && (-90.0..=90.0).contains(&coord.y)
}

/// Check that a ring can take part in spatial queries.
///
/// A valid ring has only valid coordinates (see [`is_valid_coord`]) and at
/// least three distinct vertices. A closing vertex that repeats the first one
/// does not count twice.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use safestreets_core::geometry::is_valid_ring;
///
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 1.0, y: 0.0 };
/// let c = Coord { x: 0.0, y: 1.0 };
/// assert!(is_valid_ring(&[a, b, c, a]));
/// assert!(!is_valid_ring(&[a, b, a]));
/// ```
#[must_use]
pub fn is_valid_ring(ring: &[Coord<f64>]) -> bool {
    if !ring.iter().copied().all(is_valid_coord) {
        return false;
    }
    let mut distinct: Vec<Coord<f64>> = Vec::with_capacity(ring.len());
    for &coord in ring {
        if !distinct.contains(&coord) {
            distinct.push(coord);
            if distinct.len() >= 3 {
                return true;
            }
        }
    }
    false
}
