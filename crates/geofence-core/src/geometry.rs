//! # Geometry Types
//!
//! Rings, polygons, multi-polygons, and named boundary features.
//!
//! Rings are implicitly closed: the last vertex connects back to the first,
//! and a repeated closing vertex (as emitted by most geographic formats) is
//! harmless because it produces a zero-length edge that never counts as a
//! crossing. Winding order is neither enforced nor corrected.

use serde::{Deserialize, Serialize};

use crate::bounds::BoundingBox;
use crate::containment;
use crate::coordinate::Coordinate;

/// An ordered, implicitly closed sequence of vertices.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring(pub Vec<Coordinate>);

impl Ring {
    /// Wrap a vertex list.
    pub fn new(vertices: Vec<Coordinate>) -> Self {
        Self(vertices)
    }

    /// The ring's vertices in order.
    pub fn vertices(&self) -> &[Coordinate] {
        &self.0
    }

    /// Number of stored vertices (including any repeated closing vertex).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the ring has no vertices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A ring with fewer than three vertices encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.0.len() < 3
    }

    /// Even-odd containment test. See [`containment::point_in_ring`].
    pub fn contains(&self, point: &Coordinate) -> bool {
        containment::point_in_ring(point, &self.0)
    }
}

impl From<Vec<Coordinate>> for Ring {
    fn from(vertices: Vec<Coordinate>) -> Self {
        Self(vertices)
    }
}

/// One outer ring plus zero or more holes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    /// The exterior boundary.
    pub outer: Ring,
    /// Interior rings excluded from the polygon's area.
    #[serde(default)]
    pub holes: Vec<Ring>,
}

impl Polygon {
    /// Create a polygon from its outer ring and holes.
    pub fn new(outer: Ring, holes: Vec<Ring>) -> Self {
        Self { outer, holes }
    }

    /// A polygon with no holes.
    pub fn simple(outer: Vec<Coordinate>) -> Self {
        Self::new(Ring::new(outer), Vec::new())
    }

    /// Containment with hole exclusion. See [`containment::point_in_polygon`].
    pub fn contains(&self, point: &Coordinate) -> bool {
        containment::point_in_polygon(point, self)
    }

    /// All rings, outer first.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }
}

/// An ordered list of polygons forming one logical region.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiPolygon(pub Vec<Polygon>);

impl MultiPolygon {
    /// Wrap a polygon list.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self(polygons)
    }

    /// The constituent polygons in order.
    pub fn polygons(&self) -> &[Polygon] {
        &self.0
    }

    /// Whether there are no polygons.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short-circuiting containment. See [`containment::point_in_multi_polygon`].
    pub fn contains(&self, point: &Coordinate) -> bool {
        containment::point_in_multi_polygon(point, &self.0)
    }

    /// Append every polygon of `other`, preserving order.
    pub fn extend(&mut self, other: MultiPolygon) {
        self.0.extend(other.0);
    }

    /// Envelope of every vertex, or `None` when there are no vertices.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_coordinates(self.vertices())
    }

    /// Iterate every vertex of every ring.
    pub fn vertices(&self) -> impl Iterator<Item = &Coordinate> {
        self.0
            .iter()
            .flat_map(|p| p.rings())
            .flat_map(|r| r.vertices().iter())
    }
}

impl From<Polygon> for MultiPolygon {
    fn from(polygon: Polygon) -> Self {
        Self(vec![polygon])
    }
}

/// A polygon or multi-polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "polygons")]
pub enum Geometry {
    /// A single polygon with optional holes.
    Polygon(Polygon),
    /// Several disjoint polygons.
    MultiPolygon(MultiPolygon),
}

impl Geometry {
    /// Containment dispatch over the geometry kind.
    pub fn contains(&self, point: &Coordinate) -> bool {
        match self {
            Geometry::Polygon(polygon) => containment::point_in_polygon(point, polygon),
            Geometry::MultiPolygon(multi) => {
                containment::point_in_multi_polygon(point, multi.polygons())
            }
        }
    }

    /// View the geometry as a polygon slice regardless of kind.
    pub fn polygons(&self) -> &[Polygon] {
        match self {
            Geometry::Polygon(polygon) => std::slice::from_ref(polygon),
            Geometry::MultiPolygon(multi) => multi.polygons(),
        }
    }

    /// Convert into a multi-polygon, wrapping a lone polygon.
    pub fn into_multi_polygon(self) -> MultiPolygon {
        match self {
            Geometry::Polygon(polygon) => MultiPolygon::from(polygon),
            Geometry::MultiPolygon(multi) => multi,
        }
    }

    /// Envelope of every vertex, or `None` when there are no vertices.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_coordinates(
            self.polygons()
                .iter()
                .flat_map(|p| p.rings())
                .flat_map(|r| r.vertices().iter()),
        )
    }
}

/// A named region geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryFeature {
    /// Region name, matched exactly and case-sensitively.
    pub name: String,
    /// The region outline.
    pub geometry: Geometry,
}

impl BoundaryFeature {
    /// Create a named feature.
    pub fn new(name: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            geometry,
        }
    }

    /// Whether the feature's geometry contains `point`.
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.geometry.contains(point)
    }
}
