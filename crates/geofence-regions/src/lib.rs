//! # geofence-regions — Region Assignment Service
//!
//! Principals (users, accounts) are assigned a set of administrative
//! regions. Assignment requests are validated against the loaded region
//! collection; principal-scoped point validation then runs the validator
//! with the principal's regions and restrictions.
//!
//! Unassigned principals are handled by an explicit [`UnassignedPolicy`]
//! chosen at construction. Nothing defaults to unrestricted access.

pub mod assignment;
pub mod error;
pub mod service;
pub mod store;

pub use assignment::{AssignmentUpdate, RegionAssignment, RegionPermissions, RegionRestrictions};
pub use error::AssignmentError;
pub use service::{BulkAssignmentReport, BulkFailure, RegionAssignmentService, UnassignedPolicy};
pub use store::{AssignmentStore, InMemoryAssignmentStore};
