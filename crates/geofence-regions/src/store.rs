//! # Assignment Storage
//!
//! The service persists assignments through [`AssignmentStore`]. The
//! in-memory implementation is backed by `DashMap` and is what the engine
//! uses unless the host application supplies its own.

use dashmap::DashMap;

use geofence_core::PrincipalId;

use crate::assignment::RegionAssignment;
use crate::error::AssignmentError;

/// Persistence seam for region assignments.
pub trait AssignmentStore: Send + Sync {
    fn get(&self, principal: &PrincipalId) -> Result<Option<RegionAssignment>, AssignmentError>;

    /// Insert or overwrite.
    fn put(&self, assignment: RegionAssignment) -> Result<(), AssignmentError>;

    /// Remove, returning the previous assignment.
    fn remove(&self, principal: &PrincipalId) -> Result<Option<RegionAssignment>, AssignmentError>;

    /// All principals with an assignment, sorted.
    fn principals(&self) -> Result<Vec<PrincipalId>, AssignmentError>;
}

/// Thread-safe in-memory assignment store.
#[derive(Debug, Default)]
pub struct InMemoryAssignmentStore {
    assignments: DashMap<PrincipalId, RegionAssignment>,
}

impl InMemoryAssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl AssignmentStore for InMemoryAssignmentStore {
    fn get(&self, principal: &PrincipalId) -> Result<Option<RegionAssignment>, AssignmentError> {
        Ok(self.assignments.get(principal).map(|entry| entry.value().clone()))
    }

    fn put(&self, assignment: RegionAssignment) -> Result<(), AssignmentError> {
        self.assignments.insert(assignment.principal.clone(), assignment);
        Ok(())
    }

    fn remove(&self, principal: &PrincipalId) -> Result<Option<RegionAssignment>, AssignmentError> {
        Ok(self.assignments.remove(principal).map(|(_, a)| a))
    }

    fn principals(&self) -> Result<Vec<PrincipalId>, AssignmentError> {
        let mut principals: Vec<_> = self.assignments.iter().map(|e| e.key().clone()).collect();
        principals.sort();
        Ok(principals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::{RegionPermissions, RegionRestrictions};

    fn assignment(id: &str, region: &str) -> RegionAssignment {
        RegionAssignment::new(
            PrincipalId::new(id).unwrap(),
            vec![region.to_string()],
            RegionPermissions::default(),
            RegionRestrictions::default(),
        )
    }

    #[test]
    fn test_put_overwrites() {
        let store = InMemoryAssignmentStore::new();
        store.put(assignment("u1", "A")).unwrap();
        store.put(assignment("u1", "B")).unwrap();
        assert_eq!(store.len(), 1);
        let id = PrincipalId::new("u1").unwrap();
        assert_eq!(store.get(&id).unwrap().unwrap().regions, vec!["B"]);
    }

    #[test]
    fn test_remove_and_principals() {
        let store = InMemoryAssignmentStore::new();
        store.put(assignment("zed", "A")).unwrap();
        store.put(assignment("amy", "A")).unwrap();
        let names: Vec<_> = store
            .principals()
            .unwrap()
            .iter()
            .map(|p| p.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["amy", "zed"]);

        let zed = PrincipalId::new("zed").unwrap();
        assert!(store.remove(&zed).unwrap().is_some());
        assert!(store.remove(&zed).unwrap().is_none());
        assert!(store.get(&zed).unwrap().is_none());
    }
}
