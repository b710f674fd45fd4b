//! # geofence-cli — Operator Command-Line Interface
//!
//! Runs the engine against a boundary directory (or URL) and prints
//! results as pretty JSON.
//!
//! ## Subcommands
//!
//! - `point` — validate one coordinate
//! - `path` — validate an ordered list of coordinates
//! - `regions` — list known region names
//! - `locate` — name the region containing a coordinate
//! - `config` — validate and print the effective configuration
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `geofence-api`; no geometry logic here.
//! - Validation commands report an invalid result through the exit code.

pub mod config;
pub mod regions;
pub mod validate;

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use geofence_api::{Engine, EngineConfig, SourceConfig};
use geofence_regions::UnassignedPolicy;

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// YAML configuration file.
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Directory of boundary files (overrides the configured source).
    #[arg(long, global = true, conflicts_with = "data_url")]
    pub data_dir: Option<PathBuf>,

    /// Base URL serving boundary files (overrides the configured source).
    #[arg(long, global = true)]
    pub data_url: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,
}

impl GlobalArgs {
    /// The configuration these arguments describe.
    pub fn load_config(&self) -> anyhow::Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            // The CLI never assigns regions.
            None => EngineConfig::new(UnassignedPolicy::DenyAll),
        };
        if let Some(dir) = &self.data_dir {
            config.source = Some(SourceConfig::File { dir: dir.clone() });
        }
        if let Some(base_url) = &self.data_url {
            config.source = Some(SourceConfig::Http {
                base_url: base_url.clone(),
                timeout_secs: None,
            });
        }
        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    /// An engine over the configured source.
    pub fn build_engine(&self) -> anyhow::Result<Engine> {
        let config = self.load_config()?;
        Engine::from_config(config).context("building geofence engine")
    }
}

/// Print `value` as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{text}");
    Ok(())
}
