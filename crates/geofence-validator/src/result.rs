//! # Validation Results
//!
//! Every validation call ends in exactly one [`ValidationResult`]: valid
//! (optionally annotated near-border or degraded) or one of four
//! [`Violation`] kinds. Results always carry a human-readable message.

use serde::{Deserialize, Serialize};

use geofence_core::Coordinate;

/// Why a location was rejected or flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Violation {
    /// Non-finite or out-of-range input.
    InvalidCoordinates,
    /// Outside the national outline or its envelope.
    OutsideNational,
    /// Inside the country but outside every assigned region.
    OutsideAssignedRegion,
    /// Within the configured tolerance of the national border. Advisory
    /// unless the policy makes it fatal.
    NearBorder,
}

impl Violation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCoordinates => "InvalidCoordinates",
            Self::OutsideNational => "OutsideNational",
            Self::OutsideAssignedRegion => "OutsideAssignedRegion",
            Self::NearBorder => "NearBorder",
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating a point or a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the location is accepted.
    pub valid: bool,
    /// Rejection reason, or `NearBorder` as an advisory on a valid result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub violation: Option<Violation>,
    /// Human-readable explanation.
    pub message: String,
    /// What the caller can do about it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
    /// A nearby acceptable location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_point: Option<Coordinate>,
    /// Regions the caller is allowed to use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_regions: Option<Vec<String>>,
    /// Decided without precise boundary data.
    #[serde(default)]
    pub degraded: bool,
    /// Within the border tolerance.
    #[serde(default)]
    pub near_border: bool,
    /// Distance to the national border, when computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_to_border_km: Option<f64>,
    /// 1-based position of the failing point in a path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_index: Option<usize>,
}

impl ValidationResult {
    /// An accepted location.
    pub fn valid(message: impl Into<String>) -> Self {
        Self {
            valid: true,
            violation: None,
            message: message.into(),
            suggested_action: None,
            suggested_point: None,
            allowed_regions: None,
            degraded: false,
            near_border: false,
            distance_to_border_km: None,
            failed_index: None,
        }
    }

    /// A rejected location.
    pub fn invalid(violation: Violation, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            violation: Some(violation),
            ..Self::valid(message)
        }
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.suggested_action = Some(action.into());
        self
    }

    pub fn with_point(mut self, point: Option<Coordinate>) -> Self {
        self.suggested_point = point;
        self
    }

    pub fn with_allowed_regions(mut self, regions: Vec<String>) -> Self {
        self.allowed_regions = Some(regions);
        self
    }

    /// Mark as a fallback determination.
    pub fn degraded(mut self) -> Self {
        self.degraded = true;
        self
    }

    /// Whether the result carries an advisory on an accepted location.
    pub fn is_advisory(&self) -> bool {
        self.valid && self.violation.is_some()
    }
}
