//! # Region Assignments
//!
//! The per-principal record: which administrative regions a principal may
//! work in, what they may do there, and how strictly their locations are
//! checked.

use serde::{Deserialize, Serialize};

use geofence_core::{PrincipalId, Timestamp};
use geofence_validator::ValidatorConfig;

/// What a principal may do inside their regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionPermissions {
    pub can_add_markers: bool,
    pub can_draw_lines: bool,
    pub can_draw_polygons: bool,
    /// See regions outside the assignment (read-only).
    pub can_view_all_regions: bool,
}

impl Default for RegionPermissions {
    fn default() -> Self {
        Self {
            can_add_markers: true,
            can_draw_lines: true,
            can_draw_polygons: true,
            can_view_all_regions: false,
        }
    }
}

/// How a principal's locations are validated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionRestrictions {
    pub strict: bool,
    pub allow_near_border: bool,
    pub border_tolerance_km: f64,
}

impl Default for RegionRestrictions {
    fn default() -> Self {
        Self {
            strict: true,
            allow_near_border: true,
            border_tolerance_km: 5.0,
        }
    }
}

/// A principal's region assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionAssignment {
    pub principal: PrincipalId,
    /// Distinct, validated region names in the order they were assigned.
    pub regions: Vec<String>,
    pub permissions: RegionPermissions,
    pub restrictions: RegionRestrictions,
    pub assigned_at: Timestamp,
    /// Caller-managed expiry. Recorded, never enforced here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<Timestamp>,
}

impl RegionAssignment {
    pub fn new(
        principal: PrincipalId,
        regions: Vec<String>,
        permissions: RegionPermissions,
        restrictions: RegionRestrictions,
    ) -> Self {
        Self {
            principal,
            regions,
            permissions,
            restrictions,
            assigned_at: Timestamp::now(),
            valid_until: None,
        }
    }

    /// Whether `valid_until` lies at or before `now`.
    pub fn is_expired_at(&self, now: &Timestamp) -> bool {
        self.valid_until.is_some_and(|until| until <= *now)
    }

    /// Validator policy for this principal.
    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            assigned_regions: self.regions.clone(),
            strict: self.restrictions.strict,
            allow_near_border: self.restrictions.allow_near_border,
            border_tolerance_km: self.restrictions.border_tolerance_km,
        }
    }
}

/// Partial update of an existing assignment. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentUpdate {
    /// Replacement region list, re-validated before it is applied.
    pub regions: Option<Vec<String>>,
    pub permissions: Option<RegionPermissions>,
    pub restrictions: Option<RegionRestrictions>,
    /// `Some(None)` clears the expiry.
    pub valid_until: Option<Option<Timestamp>>,
}

impl AssignmentUpdate {
    pub fn is_empty(&self) -> bool {
        self.regions.is_none()
            && self.permissions.is_none()
            && self.restrictions.is_none()
            && self.valid_until.is_none()
    }
}
