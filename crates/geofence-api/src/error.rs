//! # Engine Error
//!
//! Errors surfaced by the facade. Point validation never fails with an
//! error (it always produces a `ValidationResult`); these cover malformed
//! input, configuration, assignment requests, and direct data queries.

use thiserror::Error;

use geofence_boundary::BoundaryError;
use geofence_core::GeofenceError;
use geofence_regions::AssignmentError;

use crate::config::ConfigError;

/// Facade-level error type.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration could not be loaded or is inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A coordinate or identifier supplied by the caller is malformed.
    #[error(transparent)]
    InvalidInput(#[from] GeofenceError),

    /// An assignment request was rejected.
    #[error(transparent)]
    Assignment(#[from] AssignmentError),

    /// Boundary data needed to answer a query could not be loaded.
    #[error(transparent)]
    Boundary(#[from] BoundaryError),
}
