//! # Engine
//!
//! One object wiring the boundary store, validator, and assignment service
//! together from an [`EngineConfig`]. Hosts build one `Engine` at start-up
//! and share it (it is `Send + Sync`) across request handlers.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use geofence_boundary::{BoundarySource, BoundaryStore, StoreStats};
use geofence_core::{Coordinate, PrincipalId};
use geofence_regions::{
    AssignmentStore, BulkAssignmentReport, InMemoryAssignmentStore, RegionAssignment,
    RegionAssignmentService, RegionPermissions, RegionRestrictions,
};
use geofence_validator::{ValidationResult, Validator, ValidatorConfig};

use crate::config::{ConfigError, EngineConfig};
use crate::error::EngineError;

/// The caller-facing geofence engine.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    store: Arc<BoundaryStore>,
    validator: Arc<Validator>,
    assignments: RegionAssignmentService,
}

impl Engine {
    /// Build an engine from `config`, reading boundaries from `config.source`.
    pub fn from_config(config: EngineConfig) -> Result<Self, EngineError> {
        let source = config
            .source
            .as_ref()
            .ok_or_else(|| ConfigError::Invalid("no boundary source configured".into()))?
            .build()?;
        Self::new(config, source)
    }

    /// Build an engine over an explicit source with in-memory assignments.
    pub fn new(config: EngineConfig, source: Arc<dyn BoundarySource>) -> Result<Self, EngineError> {
        Self::with_assignment_store(config, source, Arc::new(InMemoryAssignmentStore::new()))
    }

    /// Build an engine with a host-supplied assignment store.
    pub fn with_assignment_store(
        config: EngineConfig,
        source: Arc<dyn BoundarySource>,
        assignment_store: Arc<dyn AssignmentStore>,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let store = Arc::new(BoundaryStore::new(source, config.data.clone()));
        let mut validator = Validator::new(Arc::clone(&store))
            .with_reference_locations(config.reference_locations.clone());
        if let Some(bounds) = config.national_bounds {
            validator = validator.with_national_bounds(bounds)?;
        }
        let validator = Arc::new(validator);
        let assignments = RegionAssignmentService::new(
            Arc::clone(&validator),
            assignment_store,
            config.unassigned_policy,
        )
        .with_unrestricted_validation(config.validation.clone());

        info!(
            national = %config.data.national_dataset,
            regions = %config.data.regions_dataset,
            static_bounds = config.national_bounds.is_some(),
            references = config.reference_locations.len(),
            policy = ?config.unassigned_policy,
            "Geofence engine ready"
        );
        Ok(Self {
            config,
            store,
            validator,
            assignments,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The default validation policy from configuration.
    pub fn default_validation(&self) -> &ValidatorConfig {
        &self.config.validation
    }

    pub fn store(&self) -> &Arc<BoundaryStore> {
        &self.store
    }

    pub fn validator(&self) -> &Arc<Validator> {
        &self.validator
    }

    pub fn assignments(&self) -> &RegionAssignmentService {
        &self.assignments
    }

    // ── Validation ───────────────────────────────────────────────────

    pub async fn validate_point(&self, lat: f64, lng: f64, config: &ValidatorConfig) -> ValidationResult {
        self.validator
            .validate_point(&Coordinate::new(lat, lng), config)
            .await
    }

    pub async fn validate_path(&self, points: &[Coordinate], config: &ValidatorConfig) -> ValidationResult {
        self.validator.validate_multiple(points, config).await
    }

    pub async fn validate_for_principal(
        &self,
        principal: &str,
        lat: f64,
        lng: f64,
    ) -> Result<ValidationResult, EngineError> {
        let principal = PrincipalId::new(principal)?;
        Ok(self
            .assignments
            .validate_location_for_principal(&principal, &Coordinate::new(lat, lng))
            .await?)
    }

    // ── Assignment ───────────────────────────────────────────────────

    pub async fn assign_regions(
        &self,
        principal: &str,
        regions: &[String],
        permissions: Option<RegionPermissions>,
        restrictions: Option<RegionRestrictions>,
    ) -> Result<RegionAssignment, EngineError> {
        let principal = PrincipalId::new(principal)?;
        Ok(self
            .assignments
            .assign_regions(&principal, regions, permissions, restrictions)
            .await?)
    }

    pub async fn bulk_assign(
        &self,
        principals: &[String],
        regions: &[String],
        permissions: Option<RegionPermissions>,
        restrictions: Option<RegionRestrictions>,
    ) -> Result<BulkAssignmentReport, EngineError> {
        Ok(self
            .assignments
            .bulk_assign(principals, regions, permissions, restrictions)
            .await?)
    }

    // ── Reference data ───────────────────────────────────────────────

    pub async fn list_known_regions(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.store.known_region_names().await?)
    }

    /// The region containing a point. Malformed coordinates are an error.
    pub async fn locate_region(&self, lat: f64, lng: f64) -> Result<Option<String>, EngineError> {
        let point = Coordinate::new(lat, lng);
        point
            .validate()
            .map_err(geofence_core::GeofenceError::from)?;
        Ok(self.validator.locate_region(&point).await?)
    }

    /// Start loading both datasets in the background. Failures are logged
    /// and retried on first real use.
    pub fn preload(&self) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        debug!("Spawning boundary preload");
        tokio::spawn(async move { store.preload().await })
    }

    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }
}
