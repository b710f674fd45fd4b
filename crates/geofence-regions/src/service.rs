//! # Region Assignment Service
//!
//! Validates region names against the loaded region collection, stores
//! per-principal assignments, and runs principal-scoped point validation.
//!
//! Region-name validation rejects, in this order: an empty list, duplicate
//! names (never silently de-duplicated), and names the collection does not
//! contain (exact, case-sensitive). A rejected request changes nothing.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use geofence_core::{Coordinate, PrincipalId};
use geofence_validator::{ValidationResult, Validator, ValidatorConfig, Violation};

use crate::assignment::{AssignmentUpdate, RegionAssignment, RegionPermissions, RegionRestrictions};
use crate::error::AssignmentError;
use crate::store::AssignmentStore;

/// Most suggestions offered per unknown region name.
const MAX_SUGGESTIONS: usize = 3;

/// What principal-scoped validation does for a principal with no
/// assignment. There is no default; deployments must choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnassignedPolicy {
    /// Reject every location.
    DenyAll,
    /// Check national containment only.
    Unrestricted,
}

/// One principal that could not be assigned in a bulk call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkFailure {
    pub principal: String,
    pub reason: String,
}

/// Outcome of a bulk assignment. Successes are kept even when others fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkAssignmentReport {
    pub succeeded: Vec<PrincipalId>,
    pub failed: Vec<BulkFailure>,
}

impl BulkAssignmentReport {
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Stores region assignments and validates locations on a principal's behalf.
pub struct RegionAssignmentService {
    validator: Arc<Validator>,
    assignments: Arc<dyn AssignmentStore>,
    unassigned_policy: UnassignedPolicy,
    unrestricted_validation: ValidatorConfig,
}

impl RegionAssignmentService {
    pub fn new(
        validator: Arc<Validator>,
        assignments: Arc<dyn AssignmentStore>,
        unassigned_policy: UnassignedPolicy,
    ) -> Self {
        Self {
            validator,
            assignments,
            unassigned_policy,
            unrestricted_validation: ValidatorConfig::default(),
        }
    }

    /// Policy applied to unassigned principals under
    /// [`UnassignedPolicy::Unrestricted`]. Any assigned regions in `config`
    /// are dropped; only national containment and border checks apply.
    pub fn with_unrestricted_validation(mut self, config: ValidatorConfig) -> Self {
        self.unrestricted_validation = ValidatorConfig {
            assigned_regions: Vec::new(),
            ..config
        };
        self
    }

    pub fn unassigned_policy(&self) -> UnassignedPolicy {
        self.unassigned_policy
    }

    /// Check `names` against the region collection and return them as given.
    pub async fn validate_region_names(&self, names: &[String]) -> Result<Vec<String>, AssignmentError> {
        if names.is_empty() {
            return Err(AssignmentError::EmptyRegionList);
        }

        let mut seen = HashSet::with_capacity(names.len());
        let mut duplicates: Vec<String> = Vec::new();
        for name in names {
            if !seen.insert(name.as_str()) && !duplicates.contains(name) {
                duplicates.push(name.clone());
            }
        }
        if !duplicates.is_empty() {
            return Err(AssignmentError::DuplicateRegionName { duplicates });
        }

        let regions = self.validator.store().region_collection().await?;
        let unknown: Vec<String> = names
            .iter()
            .filter(|name| !regions.contains_name(name))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            let known = regions.names();
            let mut suggestions: Vec<String> = Vec::new();
            for name in &unknown {
                for candidate in suggest(name, &known) {
                    if !suggestions.contains(&candidate) {
                        suggestions.push(candidate);
                    }
                }
            }
            return Err(AssignmentError::UnknownRegionName { unknown, suggestions });
        }

        Ok(names.to_vec())
    }

    /// Validate `region_names` and store (overwriting) the principal's
    /// assignment. Omitted permissions and restrictions take their defaults.
    pub async fn assign_regions(
        &self,
        principal: &PrincipalId,
        region_names: &[String],
        permissions: Option<RegionPermissions>,
        restrictions: Option<RegionRestrictions>,
    ) -> Result<RegionAssignment, AssignmentError> {
        let regions = self.validate_region_names(region_names).await?;
        let assignment = RegionAssignment::new(
            principal.clone(),
            regions,
            permissions.unwrap_or_default(),
            restrictions.unwrap_or_default(),
        );
        self.assignments.put(assignment.clone())?;
        info!(principal = %principal, regions = ?assignment.regions, "Regions assigned");
        Ok(assignment)
    }

    /// Merge `update` into an existing assignment.
    pub async fn update_assignment(
        &self,
        principal: &PrincipalId,
        update: AssignmentUpdate,
    ) -> Result<RegionAssignment, AssignmentError> {
        let mut assignment = self
            .assignments
            .get(principal)?
            .ok_or_else(|| AssignmentError::NotAssigned(principal.clone()))?;

        if let Some(regions) = &update.regions {
            assignment.regions = self.validate_region_names(regions).await?;
        }
        if let Some(permissions) = update.permissions {
            assignment.permissions = permissions;
        }
        if let Some(restrictions) = update.restrictions {
            assignment.restrictions = restrictions;
        }
        if let Some(valid_until) = update.valid_until {
            assignment.valid_until = valid_until;
        }

        self.assignments.put(assignment.clone())?;
        info!(principal = %principal, regions = ?assignment.regions, "Assignment updated");
        Ok(assignment)
    }

    pub fn get_assignment(&self, principal: &PrincipalId) -> Result<Option<RegionAssignment>, AssignmentError> {
        self.assignments.get(principal)
    }

    pub fn remove_assignment(&self, principal: &PrincipalId) -> Result<Option<RegionAssignment>, AssignmentError> {
        let removed = self.assignments.remove(principal)?;
        if removed.is_some() {
            info!(principal = %principal, "Assignment removed");
        }
        Ok(removed)
    }

    pub fn assigned_principals(&self) -> Result<Vec<PrincipalId>, AssignmentError> {
        self.assignments.principals()
    }

    /// Validate `point` under the principal's assignment and restrictions.
    ///
    /// A principal without an assignment is handled by the configured
    /// [`UnassignedPolicy`]. Only storage failures are returned as errors.
    pub async fn validate_location_for_principal(
        &self,
        principal: &PrincipalId,
        point: &Coordinate,
    ) -> Result<ValidationResult, AssignmentError> {
        let Some(assignment) = self.assignments.get(principal)? else {
            debug!(principal = %principal, policy = ?self.unassigned_policy, "No region assignment");
            return Ok(match self.unassigned_policy {
                UnassignedPolicy::DenyAll => ValidationResult::invalid(
                    Violation::OutsideAssignedRegion,
                    format!("No regions are assigned to {principal}"),
                )
                .with_action("Ask an administrator to assign regions")
                .with_allowed_regions(Vec::new()),
                UnassignedPolicy::Unrestricted => {
                    self.validator
                        .validate_point(point, &self.unrestricted_validation)
                        .await
                }
            });
        };

        Ok(self
            .validator
            .validate_point(point, &assignment.validator_config())
            .await)
    }

    /// Assign one validated region set to many principals.
    ///
    /// An invalid region set fails the whole call before anything is stored.
    /// Otherwise each principal succeeds or fails on its own and earlier
    /// successes are kept.
    pub async fn bulk_assign(
        &self,
        principals: &[String],
        region_names: &[String],
        permissions: Option<RegionPermissions>,
        restrictions: Option<RegionRestrictions>,
    ) -> Result<BulkAssignmentReport, AssignmentError> {
        let regions = self.validate_region_names(region_names).await?;
        let permissions = permissions.unwrap_or_default();
        let restrictions = restrictions.unwrap_or_default();

        let mut report = BulkAssignmentReport::default();
        for raw in principals {
            let stored = PrincipalId::new(raw.as_str())
                .map_err(AssignmentError::from)
                .and_then(|principal| {
                    let assignment =
                        RegionAssignment::new(principal.clone(), regions.clone(), permissions, restrictions);
                    self.assignments.put(assignment).map(|()| principal)
                });
            match stored {
                Ok(principal) => report.succeeded.push(principal),
                Err(err) => {
                    warn!(principal = %raw, error = %err, "Bulk assignment failed for principal");
                    report.failed.push(BulkFailure {
                        principal: raw.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            regions = ?regions,
            "Bulk assignment finished"
        );
        Ok(report)
    }
}

impl std::fmt::Debug for RegionAssignmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionAssignmentService")
            .field("unassigned_policy", &self.unassigned_policy)
            .field("unrestricted_validation", &self.unrestricted_validation)
            .finish_non_exhaustive()
    }
}

/// Known names sharing a case-insensitive substring relation with `name`.
fn suggest(name: &str, known: &[String]) -> Vec<String> {
    let needle = name.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    known
        .iter()
        .filter(|candidate| {
            let hay = candidate.to_lowercase();
            hay.contains(&needle) || needle.contains(&hay)
        })
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryAssignmentStore;
    use geofence_boundary::{BoundaryStore, StaticBoundarySource, StoreConfig};

    const NATIONAL: &str = r#"[{"properties": {"name": "Country"},
        "geometry": {"type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10]]]}}]"#;

    const REGIONS: &str = r#"[
        {"properties": {"name": "Punjab"},
         "geometry": {"type": "Polygon", "coordinates": [[[0,0],[4,0],[4,4],[0,4]]]}},
        {"properties": {"name": "West Bengal"},
         "geometry": {"type": "Polygon", "coordinates": [[[6,6],[10,6],[10,10],[6,10]]]}},
        {"properties": {"name": "Bengaluru Urban"},
         "geometry": {"type": "Polygon", "coordinates": [[[6,0],[10,0],[10,4],[6,4]]]}}
    ]"#;

    fn service(policy: UnassignedPolicy) -> (Arc<InMemoryAssignmentStore>, RegionAssignmentService) {
        let source = StaticBoundarySource::new()
            .with_dataset("national", NATIONAL)
            .with_dataset("regions", REGIONS);
        let store = Arc::new(BoundaryStore::new(Arc::new(source), StoreConfig::default()));
        let assignments = Arc::new(InMemoryAssignmentStore::new());
        let svc = RegionAssignmentService::new(Arc::new(Validator::new(store)), assignments.clone(), policy);
        (assignments, svc)
    }

    fn pid(id: &str) -> PrincipalId {
        PrincipalId::new(id).unwrap()
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    // ── Name validation ──────────────────────────────────────────────

    #[tokio::test]
    async fn test_empty_list_rejected() {
        let (_, svc) = service(UnassignedPolicy::DenyAll);
        let err = svc.assign_regions(&pid("u"), &[], None, None).await.unwrap_err();
        assert!(matches!(err, AssignmentError::EmptyRegionList));
    }

    #[tokio::test]
    async fn test_duplicate_names_assign_nothing() {
        let (store, svc) = service(UnassignedPolicy::DenyAll);
        let err = svc
            .assign_regions(&pid("u"), &names(&["Punjab", "West Bengal", "Punjab", "Punjab"]), None, None)
            .await
            .unwrap_err();
        match err {
            AssignmentError::DuplicateRegionName { duplicates } => assert_eq!(duplicates, vec!["Punjab"]),
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_names_with_suggestions() {
        let (store, svc) = service(UnassignedPolicy::DenyAll);
        let err = svc
            .assign_regions(&pid("u"), &names(&["Punjab", "bengal", "Atlantis"]), None, None)
            .await
            .unwrap_err();
        match err {
            AssignmentError::UnknownRegionName { unknown, suggestions } => {
                assert_eq!(unknown, vec!["bengal", "Atlantis"]);
                assert_eq!(suggestions, vec!["West Bengal", "Bengaluru Urban"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let (_, svc) = service(UnassignedPolicy::DenyAll);
        assert!(svc.validate_region_names(&names(&["punjab"])).await.is_err());
        assert!(svc.validate_region_names(&names(&["Punjab"])).await.is_ok());
    }

    #[test]
    fn test_suggest_limits_results() {
        let known = names(&["Alpha", "Alphabet", "Alpine", "Alps", "Beta"]);
        assert_eq!(suggest("alp", &known).len(), MAX_SUGGESTIONS);
        assert_eq!(suggest("Alphabetical", &known), vec!["Alpha", "Alphabet"]);
        assert!(suggest("", &known).is_empty());
    }

    // ── Assignment lifecycle ─────────────────────────────────────────

    #[tokio::test]
    async fn test_assign_overwrites_and_updates() {
        let (_, svc) = service(UnassignedPolicy::DenyAll);
        let u = pid("u");
        svc.assign_regions(&u, &names(&["Punjab"]), None, None).await.unwrap();
        let a = svc.assign_regions(&u, &names(&["West Bengal"]), None, None).await.unwrap();
        assert_eq!(a.regions, vec!["West Bengal"]);

        let update = AssignmentUpdate {
            permissions: Some(RegionPermissions {
                can_draw_polygons: false,
                ..RegionPermissions::default()
            }),
            ..AssignmentUpdate::default()
        };
        let a = svc.update_assignment(&u, update).await.unwrap();
        assert_eq!(a.regions, vec!["West Bengal"]);
        assert!(!a.permissions.can_draw_polygons);

        let bad = AssignmentUpdate {
            regions: Some(names(&["Nowhere"])),
            ..AssignmentUpdate::default()
        };
        assert!(svc.update_assignment(&u, bad).await.is_err());
        assert_eq!(svc.get_assignment(&u).unwrap().unwrap().regions, vec!["West Bengal"]);
    }

    #[tokio::test]
    async fn test_update_requires_existing_assignment() {
        let (_, svc) = service(UnassignedPolicy::DenyAll);
        let err = svc
            .update_assignment(&pid("ghost"), AssignmentUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::NotAssigned(_)));
    }

    #[tokio::test]
    async fn test_remove_and_list() {
        let (_, svc) = service(UnassignedPolicy::DenyAll);
        svc.assign_regions(&pid("b"), &names(&["Punjab"]), None, None).await.unwrap();
        svc.assign_regions(&pid("a"), &names(&["Punjab"]), None, None).await.unwrap();
        assert_eq!(svc.assigned_principals().unwrap(), vec![pid("a"), pid("b")]);
        assert!(svc.remove_assignment(&pid("a")).unwrap().is_some());
        assert_eq!(svc.assigned_principals().unwrap(), vec![pid("b")]);
    }

    // ── Principal-scoped validation ──────────────────────────────────

    #[tokio::test]
    async fn test_validate_for_assigned_principal() {
        let (_, svc) = service(UnassignedPolicy::DenyAll);
        let u = pid("u");
        let restrictions = RegionRestrictions {
            border_tolerance_km: 0.0,
            ..RegionRestrictions::default()
        };
        svc.assign_regions(&u, &names(&["Punjab"]), None, Some(restrictions))
            .await
            .unwrap();

        let inside = svc
            .validate_location_for_principal(&u, &Coordinate::new(2.0, 2.0))
            .await
            .unwrap();
        assert!(inside.valid);

        let outside = svc
            .validate_location_for_principal(&u, &Coordinate::new(8.0, 8.0))
            .await
            .unwrap();
        assert_eq!(outside.violation, Some(Violation::OutsideAssignedRegion));
        assert_eq!(outside.allowed_regions, Some(names(&["Punjab"])));
    }

    #[tokio::test]
    async fn test_unassigned_policy() {
        let point = Coordinate::new(5.0, 5.0);

        let (_, deny) = service(UnassignedPolicy::DenyAll);
        let r = deny.validate_location_for_principal(&pid("x"), &point).await.unwrap();
        assert!(!r.valid);
        assert_eq!(r.violation, Some(Violation::OutsideAssignedRegion));

        let (_, open) = service(UnassignedPolicy::Unrestricted);
        let r = open.validate_location_for_principal(&pid("x"), &point).await.unwrap();
        assert!(r.valid);
    }

    #[tokio::test]
    async fn test_unrestricted_uses_configured_policy() {
        // 0.5° from the western edge is ~55 km.
        let near_edge = Coordinate::new(5.0, 0.5);

        let (_, open) = service(UnassignedPolicy::Unrestricted);
        let r = open.validate_location_for_principal(&pid("x"), &near_edge).await.unwrap();
        assert!(r.valid);
        assert!(!r.near_border);

        let (_, open) = service(UnassignedPolicy::Unrestricted);
        let open = open.with_unrestricted_validation(ValidatorConfig {
            strict: true,
            allow_near_border: false,
            border_tolerance_km: 100.0,
            ..ValidatorConfig::default().with_assigned_regions(["West Bengal"])
        });
        let r = open.validate_location_for_principal(&pid("x"), &near_edge).await.unwrap();
        assert!(!r.valid);
        assert_eq!(r.violation, Some(Violation::NearBorder));
    }

    // ── Bulk ─────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_bulk_assign_partial_failure() {
        let (store, svc) = service(UnassignedPolicy::DenyAll);
        let report = svc
            .bulk_assign(&names(&["alice", " bob", "carol"]), &names(&["Punjab"]), None, None)
            .await
            .unwrap();
        assert_eq!(report.succeeded, vec![pid("alice"), pid("carol")]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].principal, " bob");
        assert!(!report.all_succeeded());
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_bulk_assign_invalid_regions_fails_whole_call() {
        let (store, svc) = service(UnassignedPolicy::DenyAll);
        let err = svc
            .bulk_assign(&names(&["alice"]), &names(&["Punjab", "Punjab"]), None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AssignmentError::DuplicateRegionName { .. }));
        assert!(store.is_empty());
    }
}
