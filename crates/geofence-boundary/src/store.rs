//! # Boundary Data Store
//!
//! Owns the single authoritative copy of the national outline and the
//! administrative-region collection. Each dataset sits in its own
//! [`SingleFlight`] slot, so concurrent callers share one fetch and a failed
//! load is retried by the next caller.
//!
//! The store is an explicit object rather than a module-level global:
//! applications hold one `Arc<BoundaryStore>` for the process lifetime,
//! while tests build isolated instances and assert on their load counters.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use geofence_core::Coordinate;

use crate::cache::{DatasetStats, LoadState, SingleFlight};
use crate::dataset::{NationalBoundary, RegionCollection};
use crate::error::BoundaryError;
use crate::parse::parse_features;
use crate::source::BoundarySource;

/// Dataset naming for a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Logical name of the national outline dataset.
    pub national_dataset: String,
    /// Logical name of the administrative-region dataset.
    pub regions_dataset: String,
    /// Feature property keys consulted, in order, for a region's name.
    pub name_properties: Vec<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            national_dataset: "national".to_string(),
            regions_dataset: "regions".to_string(),
            name_properties: ["name", "NAME", "shapeName", "NAME_1"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Counters for both datasets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// National outline counters.
    pub national: DatasetStats,
    /// Region collection counters.
    pub regions: DatasetStats,
}

/// Lazily loaded, shared boundary reference data.
pub struct BoundaryStore {
    source: Arc<dyn BoundarySource>,
    config: StoreConfig,
    national: SingleFlight<NationalBoundary>,
    regions: SingleFlight<RegionCollection>,
}

impl BoundaryStore {
    /// A store reading from `source` with the given dataset naming.
    pub fn new(source: Arc<dyn BoundarySource>, config: StoreConfig) -> Self {
        info!(
            source = %source.describe(),
            national = %config.national_dataset,
            regions = %config.regions_dataset,
            "Boundary store created"
        );
        Self {
            national: SingleFlight::new(config.national_dataset.clone()),
            regions: SingleFlight::new(config.regions_dataset.clone()),
            source,
            config,
        }
    }

    /// The dataset naming in use.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The national outline, loading it on first use.
    pub async fn national_boundary(&self) -> Result<Arc<NationalBoundary>, BoundaryError> {
        let source = Arc::clone(&self.source);
        let dataset = self.config.national_dataset.clone();
        let props = self.config.name_properties.clone();
        self.national
            .get_or_load(move || async move {
                let bytes = source.fetch(&dataset).await?;
                let features = parse_features(&dataset, &bytes, &props)?;
                NationalBoundary::from_features(&dataset, features)
            })
            .await
    }

    /// The administrative regions, loading them on first use.
    pub async fn region_collection(&self) -> Result<Arc<RegionCollection>, BoundaryError> {
        let source = Arc::clone(&self.source);
        let dataset = self.config.regions_dataset.clone();
        let props = self.config.name_properties.clone();
        self.regions
            .get_or_load(move || async move {
                let bytes = source.fetch(&dataset).await?;
                let features = parse_features(&dataset, &bytes, &props)?;
                if features.is_empty() {
                    return Err(BoundaryError::empty(&dataset));
                }
                Ok(RegionCollection::new(features))
            })
            .await
    }

    /// Region names in source order.
    pub async fn known_region_names(&self) -> Result<Vec<String>, BoundaryError> {
        Ok(self.region_collection().await?.names())
    }

    /// The name of the first region containing `point`, if any.
    pub async fn locate_region(&self, point: &Coordinate) -> Result<Option<String>, BoundaryError> {
        let regions = self.region_collection().await?;
        Ok(regions.locate(point).map(|f| f.name.clone()))
    }

    /// The national outline if already cached. Never suspends.
    pub fn cached_national(&self) -> Option<Arc<NationalBoundary>> {
        self.national.peek()
    }

    /// The region collection if already cached. Never suspends.
    pub fn cached_regions(&self) -> Option<Arc<RegionCollection>> {
        self.regions.peek()
    }

    /// State of the national outline slot.
    pub fn national_state(&self) -> LoadState {
        self.national.state()
    }

    /// State of the region collection slot.
    pub fn regions_state(&self) -> LoadState {
        self.regions.state()
    }

    /// State of the slot caching `dataset`, or `None` for an unknown name.
    pub fn load_state(&self, dataset: &str) -> Option<LoadState> {
        if dataset == self.national.dataset() {
            Some(self.national.state())
        } else if dataset == self.regions.dataset() {
            Some(self.regions.state())
        } else {
            None
        }
    }

    /// Warm both caches. Errors are logged and swallowed; the next real
    /// request retries.
    pub async fn preload(&self) {
        let (national, regions) = tokio::join!(self.national_boundary(), self.region_collection());
        if let Err(err) = national {
            warn!(error = %err, "Preload of national boundary failed");
        }
        if let Err(err) = regions {
            warn!(error = %err, "Preload of region collection failed");
        }
    }

    /// Load counters for both datasets.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            national: self.national.stats(),
            regions: self.regions.stats(),
        }
    }
}

impl std::fmt::Debug for BoundaryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundaryStore")
            .field("source", &self.source.describe())
            .field("config", &self.config)
            .field("national", &self.national.state())
            .field("regions", &self.regions.state())
            .finish()
    }
}
