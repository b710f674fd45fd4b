//! # Bounding Box
//!
//! Axis-aligned envelope used for fast rejection before polygon math.
//! Boxes never wrap the antimeridian: `west <= east` always holds for a
//! box built from vertex extrema.

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::GeofenceError;

/// An axis-aligned latitude/longitude envelope. Edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Maximum latitude.
    pub north: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Minimum longitude.
    pub west: f64,
}

impl BoundingBox {
    /// Create a box, rejecting inverted or non-finite edges.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self, GeofenceError> {
        let bbox = Self {
            north,
            south,
            east,
            west,
        };
        bbox.check()?;
        Ok(bbox)
    }

    /// Validate an already-constructed box (e.g. one read from config).
    pub fn check(&self) -> Result<(), GeofenceError> {
        let edges = [self.north, self.south, self.east, self.west];
        if edges.iter().any(|v| !v.is_finite()) {
            return Err(GeofenceError::Geometry(format!(
                "bounding box edges must be finite: {self:?}"
            )));
        }
        if self.south > self.north || self.west > self.east {
            return Err(GeofenceError::Geometry(format!(
                "bounding box is inverted: {self:?}"
            )));
        }
        Ok(())
    }

    /// Envelope of the vertex extrema, or `None` for an empty iterator.
    pub fn from_coordinates<'a, I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Coordinate>,
    {
        coords.into_iter().fold(None, |acc, c| {
            Some(match acc {
                None => Self {
                    north: c.latitude,
                    south: c.latitude,
                    east: c.longitude,
                    west: c.longitude,
                },
                Some(b) => Self {
                    north: b.north.max(c.latitude),
                    south: b.south.min(c.latitude),
                    east: b.east.max(c.longitude),
                    west: b.west.min(c.longitude),
                },
            })
        })
    }

    /// Inclusive range comparison on both axes.
    #[inline]
    pub fn contains(&self, point: &Coordinate) -> bool {
        point.latitude >= self.south
            && point.latitude <= self.north
            && point.longitude >= self.west
            && point.longitude <= self.east
    }

    /// The nearest point of the box to `point` (the point itself when inside).
    ///
    /// Never panics: on an inverted box the result snaps to `north`/`east`.
    pub fn clamp(&self, point: &Coordinate) -> Coordinate {
        Coordinate::new(
            point.latitude.max(self.south).min(self.north),
            point.longitude.max(self.west).min(self.east),
        )
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.north + self.south) / 2.0,
            (self.east + self.west) / 2.0,
        )
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            north: self.north.max(other.north),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            west: self.west.min(other.west),
        }
    }
}
