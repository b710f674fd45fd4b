//! # Validator
//!
//! Runs one point through a fixed sequence of gates:
//!
//! 1. input validation → `InvalidCoordinates`
//! 2. static bounds gate (when configured) → `OutsideNational`
//! 3. national outline: dynamic envelope, then precise containment. If the
//!    outline cannot be loaded the static bounds result stands, marked
//!    `degraded`; with no static bounds the point is denied as unverifiable.
//! 4. assigned regions (when any) → `OutsideAssignedRegion`
//! 5. border proximity (when a tolerance is set) → `NearBorder`, advisory
//!    or fatal depending on policy
//!
//! The validator holds no per-call state. All shared data lives in the
//! [`BoundaryStore`].

use std::sync::Arc;

use tracing::{debug, warn};

use geofence_boundary::{BoundaryStore, NationalBoundary, RegionCollection};
use geofence_core::{haversine_km, BoundingBox, Coordinate, GeofenceError};

use crate::config::{nearest_reference, ReferenceLocation, ValidatorConfig};
use crate::result::{ValidationResult, Violation};

/// Validates points and paths against the boundary store.
#[derive(Debug, Clone)]
pub struct Validator {
    store: Arc<BoundaryStore>,
    national_bounds: Option<BoundingBox>,
    reference_locations: Vec<ReferenceLocation>,
}

impl Validator {
    pub fn new(store: Arc<BoundaryStore>) -> Self {
        Self {
            store,
            national_bounds: None,
            reference_locations: Vec::new(),
        }
    }

    /// Static national envelope checked before any load, and used as the
    /// answer when the outline is unavailable. Inverted or non-finite boxes
    /// are rejected.
    pub fn with_national_bounds(mut self, bounds: BoundingBox) -> Result<Self, GeofenceError> {
        bounds.check()?;
        self.national_bounds = Some(bounds);
        Ok(self)
    }

    /// Locations offered as suggestions for points outside the country.
    pub fn with_reference_locations(mut self, locations: Vec<ReferenceLocation>) -> Self {
        self.reference_locations = locations;
        self
    }

    pub fn store(&self) -> &Arc<BoundaryStore> {
        &self.store
    }

    pub fn national_bounds(&self) -> Option<&BoundingBox> {
        self.national_bounds.as_ref()
    }

    pub fn reference_locations(&self) -> &[ReferenceLocation] {
        &self.reference_locations
    }

    /// Static fast-reject gate. `None` when no static bounds are configured.
    pub fn within_static_bounds(&self, point: &Coordinate) -> Option<bool> {
        self.national_bounds.as_ref().map(|b| b.contains(point))
    }

    /// Validate one point.
    pub async fn validate_point(&self, point: &Coordinate, config: &ValidatorConfig) -> ValidationResult {
        let result = self.evaluate(point, config).await;
        debug!(
            point = %point,
            valid = result.valid,
            violation = result.violation.map(|v| v.as_str()),
            degraded = result.degraded,
            near_border = result.near_border,
            "Validated point"
        );
        result
    }

    /// Validate points strictly in order, stopping at the first failure.
    ///
    /// The failing result gets its 1-based index in `failed_index` and as a
    /// `Point N: ` prefix on the message. An all-valid path yields one
    /// aggregate result.
    pub async fn validate_multiple(&self, points: &[Coordinate], config: &ValidatorConfig) -> ValidationResult {
        if points.is_empty() {
            return ValidationResult::invalid(Violation::InvalidCoordinates, "No points supplied")
                .with_action("Provide at least one coordinate");
        }

        let mut degraded = false;
        let mut near_border = false;
        let mut closest: Option<f64> = None;

        for (i, point) in points.iter().enumerate() {
            let mut result = self.validate_point(point, config).await;
            if !result.valid {
                let index = i + 1;
                result.message = format!("Point {index}: {}", result.message);
                result.failed_index = Some(index);
                return result;
            }
            degraded |= result.degraded;
            near_border |= result.near_border;
            if let Some(d) = result.distance_to_border_km {
                closest = Some(closest.map_or(d, |c: f64| c.min(d)));
            }
        }

        let mut result = ValidationResult::valid(format!("All {} points are valid", points.len()));
        result.degraded = degraded;
        result.near_border = near_border;
        result.distance_to_border_km = closest;
        if near_border {
            result.violation = Some(Violation::NearBorder);
            result.suggested_action = Some("Some points lie close to the national border".to_string());
        }
        result
    }

    /// The administrative region containing `point`, if any. Invalid
    /// coordinates are in no region.
    pub async fn locate_region(
        &self,
        point: &Coordinate,
    ) -> Result<Option<String>, geofence_boundary::BoundaryError> {
        if !point.is_valid() {
            return Ok(None);
        }
        self.store.locate_region(point).await
    }

    async fn evaluate(&self, point: &Coordinate, config: &ValidatorConfig) -> ValidationResult {
        if let Err(err) = point.validate() {
            return ValidationResult::invalid(Violation::InvalidCoordinates, format!("Invalid coordinates: {err}"))
                .with_action("Provide a latitude in [-90, 90] and a longitude in [-180, 180]");
        }

        if let Some(bounds) = &self.national_bounds {
            if !bounds.contains(point) {
                return self.outside_national(point, Some(bounds));
            }
        }

        let national = match self.store.national_boundary().await {
            Ok(national) => Some(national),
            Err(err) => {
                warn!(point = %point, error = %err, "National boundary unavailable, falling back to bounds");
                if self.national_bounds.is_none() {
                    return ValidationResult::invalid(
                        Violation::OutsideNational,
                        "Location could not be verified: boundary data is unavailable",
                    )
                    .with_action("Try again later")
                    .degraded();
                }
                None
            }
        };

        if let Some(national) = &national {
            if self.national_bounds.is_none() && !national.within_bounds(point) {
                return self.outside_national(point, Some(national.bounds()));
            }
            if !national.contains(point) {
                return self.outside_national(point, Some(national.bounds()));
            }
        }

        if !config.assigned_regions.is_empty() {
            if let Some(rejection) = self.check_assigned_regions(point, config).await {
                return rejection;
            }
        }

        let Some(national) = national else {
            return ValidationResult::valid(
                "Location accepted on the national bounding box only; precise boundary data is unavailable",
            )
            .degraded();
        };

        self.check_border(point, &national, config)
    }

    fn outside_national(&self, point: &Coordinate, bounds: Option<&BoundingBox>) -> ValidationResult {
        let result = ValidationResult::invalid(
            Violation::OutsideNational,
            "Location is outside the national boundary",
        );
        match nearest_reference(&self.reference_locations, point) {
            Some((loc, km)) => result
                .with_action(format!("Nearest known location is {} ({km:.0} km away)", loc.name))
                .with_point(Some(loc.coordinate)),
            None => {
                let suggestion = bounds.map(|b| {
                    let clamped = b.clamp(point);
                    if clamped == *point {
                        b.center()
                    } else {
                        clamped
                    }
                });
                result
                    .with_action("Choose a location inside the country")
                    .with_point(suggestion)
            }
        }
    }

    /// `None` when the point is inside an assigned region (or the policy
    /// accepts it without region data).
    async fn check_assigned_regions(&self, point: &Coordinate, config: &ValidatorConfig) -> Option<ValidationResult> {
        let allowed = config.assigned_regions.clone();
        let regions = match self.store.region_collection().await {
            Ok(regions) => regions,
            Err(err) => {
                warn!(error = %err, strict = config.strict, "Region data unavailable");
                if config.strict {
                    return Some(
                        ValidationResult::invalid(
                            Violation::OutsideAssignedRegion,
                            "Location could not be confirmed inside an assigned region: region data is unavailable",
                        )
                        .with_action("Try again later")
                        .with_allowed_regions(allowed)
                        .degraded(),
                    );
                }
                return None;
            }
        };

        let mut known = 0;
        for name in &config.assigned_regions {
            match regions.get(name) {
                Some(feature) => {
                    known += 1;
                    if feature.contains(point) {
                        return None;
                    }
                }
                None => warn!(region = %name, "Assigned region not present in region data"),
            }
        }
        debug!(point = %point, checked = known, "Point outside every assigned region");

        let suggestion = nearest_region_center(&regions, &config.assigned_regions, point);
        Some(
            ValidationResult::invalid(
                Violation::OutsideAssignedRegion,
                format!(
                    "Location is outside your assigned regions: {}",
                    allowed.join(", ")
                ),
            )
            .with_action("Choose a location inside one of your assigned regions")
            .with_point(suggestion)
            .with_allowed_regions(allowed),
        )
    }

    fn check_border(&self, point: &Coordinate, national: &NationalBoundary, config: &ValidatorConfig) -> ValidationResult {
        let mut result = ValidationResult::valid("Location is valid");
        if !config.border_check_enabled() {
            return result;
        }

        let Some(distance) = national.distance_to_border_km(point) else {
            return result;
        };
        result.distance_to_border_km = Some(distance);
        if distance >= config.border_tolerance_km {
            return result;
        }

        let message = format!(
            "Location is {distance:.2} km from the national border (tolerance {} km)",
            config.border_tolerance_km
        );
        if config.strict && !config.allow_near_border {
            let mut rejected = ValidationResult::invalid(Violation::NearBorder, message)
                .with_action("Move the location further inside the border");
            rejected.near_border = true;
            rejected.distance_to_border_km = Some(distance);
            return rejected;
        }

        result.violation = Some(Violation::NearBorder);
        result.near_border = true;
        result.message = message;
        result
    }
}

fn nearest_region_center(regions: &RegionCollection, names: &[String], point: &Coordinate) -> Option<Coordinate> {
    names
        .iter()
        .filter_map(|name| regions.get(name))
        .filter_map(|feature| feature.geometry.bounding_box())
        .map(|bbox| bbox.center())
        .min_by(|a, b| haversine_km(point, a).total_cmp(&haversine_km(point, b)))
}
