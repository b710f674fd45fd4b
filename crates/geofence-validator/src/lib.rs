//! # geofence-validator — Point and Path Validation
//!
//! Decides whether a coordinate lies inside the country and, optionally,
//! inside a caller's assigned administrative regions. Each call runs a
//! fixed gate sequence (input, fast-reject bounds, precise national
//! containment, assigned regions, border proximity) and ends in exactly one
//! [`ValidationResult`].
//!
//! ## Degradation
//!
//! Boundary load failures never reach callers as errors. A missing
//! national outline falls back to the static bounding box when one is
//! configured and denies the point otherwise; missing region data denies
//! in strict mode and passes in lenient mode. Either way the result is
//! marked `degraded`.

pub mod config;
pub mod result;
pub mod validator;

pub use config::{nearest_reference, ReferenceLocation, ValidatorConfig};
pub use result::{ValidationResult, Violation};
pub use validator::Validator;
