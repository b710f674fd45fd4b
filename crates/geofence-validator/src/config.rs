//! # Validation Configuration
//!
//! Per-call policy for the validator, and the fixed reference locations
//! used to phrase "nearest known place" suggestions.

use serde::{Deserialize, Serialize};

use geofence_core::{haversine_km, Coordinate};

/// Per-call validation policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Region names the point must fall inside (any one suffices). Empty
    /// means national containment only.
    pub assigned_regions: Vec<String>,
    /// Deny when region data is unavailable, and make near-border points
    /// invalid unless `allow_near_border` is set.
    pub strict: bool,
    /// In strict mode, accept near-border points with an advisory.
    pub allow_near_border: bool,
    /// Distance from the national border under which a point is "near
    /// border". Zero disables the check.
    pub border_tolerance_km: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            assigned_regions: Vec::new(),
            strict: true,
            allow_near_border: true,
            border_tolerance_km: 0.0,
        }
    }
}

impl ValidatorConfig {
    /// The same policy restricted to `regions`.
    pub fn with_assigned_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assigned_regions = regions.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the border-proximity check runs at all.
    pub fn border_check_enabled(&self) -> bool {
        self.border_tolerance_km > 0.0
    }
}

/// A named point used when suggesting where a rejected location should go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLocation {
    /// Display name (usually a city).
    pub name: String,
    /// Position of the location.
    #[serde(flatten)]
    pub coordinate: Coordinate,
}

impl ReferenceLocation {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            coordinate: Coordinate::new(latitude, longitude),
        }
    }
}

/// The reference location closest to `point`, with its distance in km.
pub fn nearest_reference<'a>(
    locations: &'a [ReferenceLocation],
    point: &Coordinate,
) -> Option<(&'a ReferenceLocation, f64)> {
    locations
        .iter()
        .map(|loc| (loc, haversine_km(point, &loc.coordinate)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ValidatorConfig::default();
        assert!(cfg.assigned_regions.is_empty());
        assert!(cfg.strict);
        assert!(!cfg.border_check_enabled());
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let cfg: ValidatorConfig =
            serde_json::from_str(r#"{"border_tolerance_km": 5.0, "strict": false}"#).unwrap();
        assert!(!cfg.strict);
        assert!(cfg.allow_near_border);
        assert!(cfg.border_check_enabled());
    }

    #[test]
    fn test_reference_location_flattened() {
        let loc: ReferenceLocation =
            serde_json::from_str(r#"{"name": "Capital", "latitude": 28.6, "longitude": 77.2}"#)
                .unwrap();
        assert_eq!(loc, ReferenceLocation::new("Capital", 28.6, 77.2));
    }

    #[test]
    fn test_nearest_reference() {
        let refs = vec![
            ReferenceLocation::new("North", 9.0, 5.0),
            ReferenceLocation::new("South", 1.0, 5.0),
        ];
        let (loc, km) = nearest_reference(&refs, &Coordinate::new(-3.0, 5.0)).unwrap();
        assert_eq!(loc.name, "South");
        assert!(km > 400.0 && km < 500.0);
        assert!(nearest_reference(&[], &Coordinate::new(0.0, 0.0)).is_none());
    }
}
