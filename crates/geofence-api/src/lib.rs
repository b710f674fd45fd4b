//! # geofence-api — Caller-Facing Facade
//!
//! The surface host applications program against. An [`Engine`] is built
//! from an [`EngineConfig`] (usually YAML) and a boundary source, and
//! exposes every operation the engine offers:
//!
//! - `validate_point` / `validate_path` — national and assigned-region checks
//! - `assign_regions` / `bulk_assign` — principal region assignment
//! - `validate_for_principal` — validation under a principal's assignment
//! - `list_known_regions` / `locate_region` — reference data queries
//! - `preload` — fire-and-forget cache warm-up
//!
//! ## Crate Policy
//!
//! - Sits at the top of the library dependency DAG.
//! - No geometry or assignment logic here; everything delegates to the
//!   domain crates.

pub mod config;
pub mod engine;
pub mod error;

pub use config::{ConfigError, EngineConfig, SourceConfig};
pub use engine::Engine;
pub use error::EngineError;
