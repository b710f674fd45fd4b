//! # Coordinate
//!
//! A WGS84 latitude/longitude pair in decimal degrees. Geometry code treats
//! longitude as `x` and latitude as `y`.

use serde::{Deserialize, Serialize};

use crate::error::CoordinateError;

/// Valid latitude range, inclusive.
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

/// Valid longitude range, inclusive.
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate. No validation is performed; call
    /// [`Coordinate::validate`] on untrusted input.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build a coordinate from a `[longitude, latitude]` position, the axis
    /// order used by nested-coordinate geographic formats.
    pub const fn from_lng_lat(longitude: f64, latitude: f64) -> Self {
        Self::new(latitude, longitude)
    }

    /// Check that both axes are finite and within range.
    ///
    /// Non-finite values are reported before range violations so that NaN
    /// never reaches a range comparison.
    pub fn validate(&self) -> Result<(), CoordinateError> {
        if !self.latitude.is_finite() {
            return Err(CoordinateError::NonFiniteLatitude(self.latitude));
        }
        if !self.longitude.is_finite() {
            return Err(CoordinateError::NonFiniteLongitude(self.longitude));
        }
        if self.latitude < LATITUDE_RANGE.0 || self.latitude > LATITUDE_RANGE.1 {
            return Err(CoordinateError::LatitudeOutOfRange(self.latitude));
        }
        if self.longitude < LONGITUDE_RANGE.0 || self.longitude > LONGITUDE_RANGE.1 {
            return Err(CoordinateError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }

    /// Whether [`Coordinate::validate`] would succeed.
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// The `x` axis used by planar algorithms (longitude).
    #[inline]
    pub fn x(&self) -> f64 {
        self.longitude
    }

    /// The `y` axis used by planar algorithms (latitude).
    #[inline]
    pub fn y(&self) -> f64 {
        self.latitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
