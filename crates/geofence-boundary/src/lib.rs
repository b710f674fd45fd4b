//! # geofence-boundary — Boundary Data Store
//!
//! Loads the national outline and the administrative-region collection on
//! demand and keeps exactly one copy of each for the life of the process.
//!
//! ## Components
//!
//! - **Sources** (`source.rs`): the [`BoundarySource`] contract plus file,
//!   HTTP and in-memory implementations. The store knows nothing about
//!   where bytes come from.
//!
//! - **Parsing** (`parse.rs`): nested-coordinate feature documents into
//!   [`geofence_core::BoundaryFeature`]s, `[longitude, latitude]` order.
//!
//! - **Datasets** (`dataset.rs`): [`NationalBoundary`] (outline plus its
//!   envelope) and [`RegionCollection`] (name-indexed regions in source
//!   order).
//!
//! - **Cache** (`cache.rs`): [`SingleFlight`], the
//!   `Unloaded → Loading → Loaded | Failed` slot that coalesces concurrent
//!   requests onto one load and retries after failure.
//!
//! - **Store** (`store.rs`): [`BoundaryStore`], one `SingleFlight` per
//!   dataset behind a shared source.
//!
//! ## Concurrency
//!
//! Loads run on spawned tokio tasks. Readers that find a dataset cached
//! never suspend; readers that arrive during a load wait on a `watch`
//! channel and all observe the same outcome.

pub mod cache;
pub mod dataset;
pub mod error;
pub mod parse;
pub mod source;
pub mod store;

// ─── Store re-exports ───────────────────────────────────────────────

pub use cache::{DatasetStats, LoadState, SingleFlight};
pub use store::{BoundaryStore, StoreConfig, StoreStats};

// ─── Data re-exports ────────────────────────────────────────────────

pub use dataset::{NationalBoundary, RegionCollection};
pub use error::{BoundaryError, FailureKind};
pub use parse::parse_features;
pub use source::{BoundarySource, FileBoundarySource, HttpBoundarySource, StaticBoundarySource};
