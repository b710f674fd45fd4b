//! # Containment Primitives
//!
//! Even-odd ray casting over rings, with hole exclusion for polygons and
//! short-circuiting disjunction for multi-polygons.
//!
//! ## Edge Convention
//!
//! An edge `(a, b)` counts as a crossing when exactly one endpoint lies
//! strictly above the point (`(a.y > y) != (b.y > y)`) and the point lies
//! strictly left of the edge's intersection with the horizontal through the
//! point. No epsilon is applied. Consequences for an axis-aligned ring:
//!
//! - points on the southern (minimum-latitude) edge are **inside**;
//! - points on the western (minimum-longitude) edge are **inside**;
//! - points on the northern or eastern edges are **outside**.
//!
//! The classification is a pure function of the ring's vertex order, so the
//! same query always yields the same answer.

use crate::coordinate::Coordinate;
use crate::geometry::Polygon;

/// Even-odd ray casting. Rings with fewer than three vertices contain nothing.
pub fn point_in_ring(point: &Coordinate, ring: &[Coordinate]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let (x, y) = (point.x(), point.y());
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i].x(), ring[i].y());
        let (xj, yj) = (ring[j].x(), ring[j].y());
        if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Inside the outer ring and inside none of the holes.
///
/// The outer ring is tested first; holes are only consulted for points
/// already inside it, and the first matching hole short-circuits.
pub fn point_in_polygon(point: &Coordinate, polygon: &Polygon) -> bool {
    if !point_in_ring(point, polygon.outer.vertices()) {
        return false;
    }
    !polygon
        .holes
        .iter()
        .any(|hole| point_in_ring(point, hole.vertices()))
}

/// Inside any constituent polygon, evaluated in order.
pub fn point_in_multi_polygon(point: &Coordinate, polygons: &[Polygon]) -> bool {
    polygons.iter().any(|polygon| point_in_polygon(point, polygon))
}
