//! # Great-Circle Distance
//!
//! Haversine distance on a spherical Earth, plus point-to-boundary distance
//! used for border-proximity advisories. Neither is used for containment.

use crate::coordinate::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two coordinates in kilometres.
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for near-antipodal pairs.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance from `point` to the segment `a`–`b` in kilometres.
///
/// The nearest point on the segment is found in an equirectangular
/// projection centred on `point`, then measured with [`haversine_km`].
/// Accurate for the short distances border advisories care about; segments
/// crossing the antimeridian are not supported.
pub fn distance_to_segment_km(point: &Coordinate, a: &Coordinate, b: &Coordinate) -> f64 {
    let k = point.latitude.to_radians().cos();
    if k < 1e-12 {
        return haversine_km(point, a).min(haversine_km(point, b));
    }

    let project = |c: &Coordinate| ((c.longitude - point.longitude) * k, c.latitude - point.latitude);
    let (ax, ay) = project(a);
    let (bx, by) = project(b);
    let (dx, dy) = (bx - ax, by - ay);

    let len2 = dx * dx + dy * dy;
    let t = if len2 == 0.0 {
        0.0
    } else {
        (-(ax * dx + ay * dy) / len2).clamp(0.0, 1.0)
    };

    let nearest = Coordinate::new(
        point.latitude + (ay + t * dy),
        point.longitude + (ax + t * dx) / k,
    );
    haversine_km(point, &nearest)
}

/// Distance from `point` to the nearest edge of an implicitly closed ring.
///
/// Returns `None` for an empty ring. A single-vertex ring degrades to the
/// distance to that vertex.
pub fn distance_to_ring_km(point: &Coordinate, ring: &[Coordinate]) -> Option<f64> {
    match ring.len() {
        0 => None,
        1 => Some(haversine_km(point, &ring[0])),
        n => {
            let mut best = f64::INFINITY;
            let mut j = n - 1;
            for i in 0..n {
                best = best.min(distance_to_segment_km(point, &ring[j], &ring[i]));
                j = i;
            }
            Some(best)
        }
    }
}
