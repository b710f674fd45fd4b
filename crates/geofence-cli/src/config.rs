//! # Config Subcommand
//!
//! Validates the configuration (file plus command-line overrides) and
//! prints the effective result as YAML.

use anyhow::Context;

use geofence_api::EngineConfig;

use crate::GlobalArgs;

pub fn run(global: &GlobalArgs) -> anyhow::Result<EngineConfig> {
    let config = global.load_config()?;
    let yaml = serde_yaml::to_string(&config).context("serializing configuration")?;
    print!("{yaml}");
    Ok(config)
}
