//! # Region Subcommands
//!
//! `geofence regions` lists region names in source order.
//! `geofence locate --lat .. --lng ..` names the region containing a point.

use clap::Args;
use serde::Serialize;

use geofence_api::Engine;

use crate::print_json;

/// Arguments for the locate subcommand.
#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Latitude in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,
}

#[derive(Debug, Serialize)]
pub struct LocateOutput {
    pub latitude: f64,
    pub longitude: f64,
    pub region: Option<String>,
}

pub async fn run_list(engine: &Engine) -> anyhow::Result<Vec<String>> {
    let names = engine.list_known_regions().await?;
    print_json(&names)?;
    Ok(names)
}

pub async fn run_locate(engine: &Engine, args: &LocateArgs) -> anyhow::Result<LocateOutput> {
    let region = engine.locate_region(args.lat, args.lng).await?;
    let output = LocateOutput {
        latitude: args.lat,
        longitude: args.lng,
        region,
    };
    print_json(&output)?;
    Ok(output)
}
