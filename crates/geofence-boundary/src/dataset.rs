//! # Cached Datasets
//!
//! The two immutable snapshots the store hands out behind `Arc`s.
//!
//! A [`NationalBoundary`] bundles the country outline with the envelope
//! derived from it, so the fast-reject gate and the precise containment
//! check always read the same snapshot.

use std::collections::HashMap;

use geofence_core::{
    distance_to_ring_km, BoundaryFeature, BoundingBox, Coordinate, Geometry, MultiPolygon,
};
use tracing::debug;

use crate::error::BoundaryError;

// ─── National Boundary ───────────────────────────────────────────────

/// The national outline and its envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct NationalBoundary {
    geometry: MultiPolygon,
    bounds: BoundingBox,
}

impl NationalBoundary {
    /// Merge every feature of the national dataset into one multi-polygon.
    ///
    /// Fails with an `Empty` error when no vertices remain.
    pub fn from_features(dataset: &str, features: Vec<BoundaryFeature>) -> Result<Self, BoundaryError> {
        let mut geometry = MultiPolygon::default();
        for feature in features {
            geometry.extend(feature.geometry.into_multi_polygon());
        }
        Self::from_geometry(dataset, geometry)
    }

    /// Wrap an existing multi-polygon, deriving its envelope.
    pub fn from_geometry(dataset: &str, geometry: MultiPolygon) -> Result<Self, BoundaryError> {
        let bounds = geometry
            .bounding_box()
            .ok_or_else(|| BoundaryError::empty(dataset))?;
        Ok(Self { geometry, bounds })
    }

    /// The outline.
    pub fn geometry(&self) -> &MultiPolygon {
        &self.geometry
    }

    /// Envelope of the outline's vertices.
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Fast-reject gate: inside the envelope.
    pub fn within_bounds(&self, point: &Coordinate) -> bool {
        self.bounds.contains(point)
    }

    /// Precise containment against the outline.
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.geometry.contains(point)
    }

    /// Distance from `point` to the nearest edge of any ring (outer or hole).
    pub fn distance_to_border_km(&self, point: &Coordinate) -> Option<f64> {
        self.geometry
            .polygons()
            .iter()
            .flat_map(|p| p.rings())
            .filter_map(|ring| distance_to_ring_km(point, ring.vertices()))
            .min_by(|a, b| a.total_cmp(b))
    }
}

// ─── Region Collection ───────────────────────────────────────────────

/// Named administrative regions in source order.
#[derive(Debug, Clone, Default)]
pub struct RegionCollection {
    features: Vec<BoundaryFeature>,
    index: HashMap<String, usize>,
}

impl RegionCollection {
    /// Index features by exact name. Features sharing a name are merged
    /// into one multi-polygon at the position of the first.
    pub fn new(features: Vec<BoundaryFeature>) -> Self {
        let mut kept: Vec<BoundaryFeature> = Vec::with_capacity(features.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(features.len());
        for feature in features {
            if let Some(&i) = index.get(&feature.name) {
                debug!(region = %feature.name, "Merging repeated region feature");
                let existing = &mut kept[i];
                let mut merged = std::mem::replace(
                    &mut existing.geometry,
                    Geometry::MultiPolygon(MultiPolygon::default()),
                )
                .into_multi_polygon();
                merged.extend(feature.geometry.into_multi_polygon());
                existing.geometry = Geometry::MultiPolygon(merged);
                continue;
            }
            index.insert(feature.name.clone(), kept.len());
            kept.push(feature);
        }
        Self {
            features: kept,
            index,
        }
    }

    /// Region names in source order.
    pub fn names(&self) -> Vec<String> {
        self.features.iter().map(|f| f.name.clone()).collect()
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&BoundaryFeature> {
        self.index.get(name).map(|&i| &self.features[i])
    }

    /// Whether `name` is a known region.
    pub fn contains_name(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All features in source order.
    pub fn features(&self) -> &[BoundaryFeature] {
        &self.features
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// The first region, in source order, whose geometry contains `point`.
    pub fn locate(&self, point: &Coordinate) -> Option<&BoundaryFeature> {
        self.features.iter().find(|f| f.contains(point))
    }
}
