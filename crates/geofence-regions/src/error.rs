//! # Assignment Errors
//!
//! Assignment-time validation failures. These are distinct from
//! point-validation violations: they describe a bad request to assign
//! regions, not a bad location.

use thiserror::Error;

use geofence_boundary::BoundaryError;
use geofence_core::{GeofenceError, PrincipalId};

/// Error type for the region assignment service.
#[derive(Error, Debug)]
pub enum AssignmentError {
    /// No region names were supplied.
    #[error("at least one region must be assigned")]
    EmptyRegionList,

    /// The same name appeared more than once in the request.
    #[error("duplicate region names: {}", .duplicates.join(", "))]
    DuplicateRegionName {
        /// Each repeated name, once, in first-repeat order.
        duplicates: Vec<String>,
    },

    /// Names not present in the region collection.
    #[error("unknown region names: {}{}", .unknown.join(", "), suggestion_suffix(.suggestions))]
    UnknownRegionName {
        /// Unknown names in request order.
        unknown: Vec<String>,
        /// Known names that resemble the unknown ones.
        suggestions: Vec<String>,
    },

    /// The principal identifier is malformed.
    #[error("invalid principal: {0}")]
    InvalidPrincipal(#[from] GeofenceError),

    /// The principal has no assignment to update.
    #[error("{0} has no region assignment")]
    NotAssigned(PrincipalId),

    /// Region names could not be checked because the collection failed to load.
    #[error(transparent)]
    DataUnavailable(#[from] BoundaryError),

    /// The assignment store failed.
    #[error("assignment storage error: {0}")]
    Storage(String),
}

fn suggestion_suffix(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}
