//! # Engine Configuration
//!
//! YAML configuration for an [`Engine`](crate::Engine). Everything has a
//! default except `unassigned_policy`, which deployments must state.
//!
//! ```yaml
//! source:
//!   kind: file
//!   dir: /var/lib/geofence
//! data:
//!   national_dataset: india-national
//!   regions_dataset: india-states
//! national_bounds: { north: 37.1, south: 6.7, east: 97.4, west: 68.1 }
//! reference_locations:
//!   - { name: New Delhi, latitude: 28.61, longitude: 77.21 }
//! validation:
//!   border_tolerance_km: 10
//! unassigned_policy: deny_all
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use geofence_boundary::{BoundaryError, BoundarySource, FileBoundarySource, HttpBoundarySource, StoreConfig};
use geofence_core::BoundingBox;
use geofence_regions::UnassignedPolicy;
use geofence_validator::{ReferenceLocation, ValidatorConfig};

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML did not match the configuration schema.
    #[error("parsing config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The values are individually well-formed but unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where boundary datasets are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// `<dir>/<dataset>.geojson` or `.json`.
    File { dir: PathBuf },
    /// `GET <base_url>/<dataset>.geojson`.
    Http {
        base_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_secs: Option<u64>,
    },
}

impl SourceConfig {
    /// Build the configured source.
    pub fn build(&self) -> Result<Arc<dyn BoundarySource>, BoundaryError> {
        Ok(match self {
            Self::File { dir } => Arc::new(FileBoundarySource::new(dir.clone())),
            Self::Http { base_url, timeout_secs } => {
                let timeout = timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or(HttpBoundarySource::DEFAULT_TIMEOUT);
                Arc::new(HttpBoundarySource::with_timeout(base_url.clone(), timeout)?)
            }
        })
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Boundary source. May be omitted when the host supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceConfig>,
    /// Dataset names and name properties.
    #[serde(default)]
    pub data: StoreConfig,
    /// Static national envelope for fast rejection and degraded answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub national_bounds: Option<BoundingBox>,
    /// Suggestion targets for points outside the country.
    #[serde(default)]
    pub reference_locations: Vec<ReferenceLocation>,
    /// Default policy for point and path validation.
    #[serde(default)]
    pub validation: ValidatorConfig,
    /// Treatment of principals with no assignment.
    pub unassigned_policy: UnassignedPolicy,
}

impl EngineConfig {
    /// A configuration with every default and the given unassigned policy.
    pub fn new(unassigned_policy: UnassignedPolicy) -> Self {
        Self {
            source: None,
            data: StoreConfig::default(),
            national_bounds: None,
            reference_locations: Vec::new(),
            validation: ValidatorConfig::default(),
            unassigned_policy,
        }
    }

    /// Parse and validate YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Reject values that would make the engine misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.national_dataset.trim().is_empty() || self.data.regions_dataset.trim().is_empty() {
            return Err(ConfigError::Invalid("dataset names must not be empty".into()));
        }
        if self.data.name_properties.is_empty() {
            return Err(ConfigError::Invalid("name_properties must list at least one key".into()));
        }
        if let Some(bounds) = &self.national_bounds {
            bounds
                .check()
                .map_err(|e| ConfigError::Invalid(format!("national_bounds: {e}")))?;
        }
        for loc in &self.reference_locations {
            loc.coordinate
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("reference location {:?}: {e}", loc.name)))?;
        }
        let tolerance = self.validation.border_tolerance_km;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "border_tolerance_km must be a non-negative number, got {tolerance}"
            )));
        }
        if let Some(SourceConfig::Http { base_url, .. }) = &self.source {
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "source base_url must be http(s), got {base_url:?}"
                )));
            }
        }
        Ok(())
    }
}
