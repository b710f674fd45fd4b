//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared across the geofence workspace. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Coordinate errors name the offending axis and value.
//! - Geometry construction errors name the ring and the vertex count seen.
//! - Downstream crates wrap these in their own error enums via `#[from]`.

use thiserror::Error;

/// Top-level error type for the geofence core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeofenceError {
    /// A coordinate failed validation.
    #[error("invalid coordinate: {0}")]
    Coordinate(#[from] CoordinateError),

    /// A geometry could not be constructed from its input.
    #[error("invalid geometry: {0}")]
    Geometry(String),

    /// An identifier failed validation.
    #[error("invalid identifier: {0}")]
    Identifier(String),

    /// A timestamp could not be parsed or constructed.
    #[error("invalid timestamp: {0}")]
    Timestamp(String),
}

/// Why a coordinate was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum CoordinateError {
    /// Latitude is NaN or infinite.
    #[error("latitude is not a finite number: {0}")]
    NonFiniteLatitude(f64),

    /// Longitude is NaN or infinite.
    #[error("longitude is not a finite number: {0}")]
    NonFiniteLongitude(f64),

    /// Latitude lies outside [-90, 90].
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude lies outside [-180, 180].
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}
