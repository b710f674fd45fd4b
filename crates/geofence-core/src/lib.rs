//! # geofence-core — Foundational Types for the Geofence Engine
//!
//! This crate is the leaf of the geofence workspace. It defines the data
//! model every other crate speaks: coordinates, rings, polygons,
//! multi-polygons, named boundary features, bounding boxes, and the pure
//! geometry primitives that answer containment and distance queries.
//!
//! ## Key Design Principles
//!
//! 1. **Validated coordinates at the edge.** `Coordinate::validate()` rejects
//!    NaN, infinities, and out-of-range values before any geometry runs.
//!
//! 2. **Tagged geometry.** `Geometry` is a sum type over `Polygon` and
//!    `MultiPolygon`. Containment dispatch is an exhaustive `match`; there is
//!    no stringly-typed branching on a geometry type tag.
//!
//! 3. **Pure primitives.** Everything in [`containment`] and [`distance`] is
//!    stateless, allocation-free, and never suspends.
//!
//! 4. **Deterministic edge classification.** Ray casting uses a half-open
//!    crossing rule with no epsilon, so a point lying exactly on an edge is
//!    always classified the same way for the same ring.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `geofence-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod bounds;
pub mod containment;
pub mod coordinate;
pub mod distance;
pub mod error;
pub mod geometry;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use bounds::BoundingBox;
pub use containment::{point_in_multi_polygon, point_in_polygon, point_in_ring};
pub use coordinate::Coordinate;
pub use distance::{distance_to_ring_km, haversine_km, EARTH_RADIUS_KM};
pub use error::{CoordinateError, GeofenceError};
pub use geometry::{BoundaryFeature, Geometry, MultiPolygon, Polygon, Ring};
pub use identity::PrincipalId;
pub use temporal::Timestamp;
