//! # Principal Identity
//!
//! Newtype wrapper for the account on whose behalf region-scoped
//! validation runs. Principal identifiers come from the surrounding
//! application (user ids, account handles); the engine only requires
//! that they are non-empty and free of surrounding whitespace.

use serde::{Deserialize, Serialize};

use crate::error::GeofenceError;

/// Identifier of a user or account with region assignments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Validate and wrap a principal identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, GeofenceError> {
        let id = id.into();
        if id.is_empty() {
            return Err(GeofenceError::Identifier(
                "principal id must not be empty".to_string(),
            ));
        }
        if id.trim() != id {
            return Err(GeofenceError::Identifier(format!(
                "principal id {id:?} has leading or trailing whitespace"
            )));
        }
        Ok(Self(id))
    }

    /// Access the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PrincipalId {
    type Error = GeofenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PrincipalId> for String {
    fn from(id: PrincipalId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "principal:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_principal() {
        let id = PrincipalId::new("field-officer-17").unwrap();
        assert_eq!(id.as_str(), "field-officer-17");
        assert_eq!(id.to_string(), "principal:field-officer-17");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(PrincipalId::new("").is_err());
    }

    #[test]
    fn test_whitespace_rejected() {
        assert!(PrincipalId::new(" alice").is_err());
        assert!(PrincipalId::new("alice\n").is_err());
    }

    #[test]
    fn test_serde_validates() {
        let ok: PrincipalId = serde_json::from_str("\"bob\"").unwrap();
        assert_eq!(ok.as_str(), "bob");
        assert!(serde_json::from_str::<PrincipalId>("\"\"").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "\"bob\"");
    }
}
