//! # Point and Path Subcommands
//!
//! `geofence point --lat 28.6 --lng 77.2 [--region NAME ...]`
//! `geofence path --point 28.6,77.2 --point 28.7,77.3 [--region NAME ...]`

use clap::Args;
use tracing::info;

use geofence_api::Engine;
use geofence_core::Coordinate;
use geofence_validator::{ValidationResult, ValidatorConfig};

use crate::print_json;

/// Arguments for the point subcommand.
#[derive(Args, Debug)]
pub struct PointArgs {
    /// Latitude in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lat: f64,

    /// Longitude in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lng: f64,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Arguments for the path subcommand.
#[derive(Args, Debug)]
pub struct PathArgs {
    /// A vertex as `LAT,LNG`. Repeat in path order.
    #[arg(long = "point", required = true, allow_hyphen_values = true, value_parser = parse_lat_lng)]
    pub points: Vec<Coordinate>,

    #[command(flatten)]
    pub policy: PolicyArgs,
}

/// Per-call overrides of the configured validation policy.
#[derive(Args, Debug, Default)]
pub struct PolicyArgs {
    /// Restrict to these regions (repeatable).
    #[arg(long = "region")]
    pub regions: Vec<String>,

    /// Border tolerance in km (0 disables the border check).
    #[arg(long)]
    pub border_tolerance_km: Option<f64>,

    /// Accept points when region data is unavailable, and accept near-border points.
    #[arg(long)]
    pub lenient: bool,
}

impl PolicyArgs {
    /// `base` with these overrides applied.
    pub fn apply(&self, base: &ValidatorConfig) -> ValidatorConfig {
        let mut config = base.clone();
        if !self.regions.is_empty() {
            config.assigned_regions = self.regions.clone();
        }
        if let Some(km) = self.border_tolerance_km {
            config.border_tolerance_km = km;
        }
        if self.lenient {
            config.strict = false;
        }
        config
    }
}

/// Parse `LAT,LNG`.
pub fn parse_lat_lng(s: &str) -> Result<Coordinate, String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got {s:?}"))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("bad latitude {lat:?}: {e}"))?;
    let lng: f64 = lng
        .trim()
        .parse()
        .map_err(|e| format!("bad longitude {lng:?}: {e}"))?;
    Ok(Coordinate::new(lat, lng))
}

/// Validate one point and print the result.
pub async fn run_point(engine: &Engine, args: &PointArgs) -> anyhow::Result<ValidationResult> {
    let config = args.policy.apply(engine.default_validation());
    let result = engine.validate_point(args.lat, args.lng, &config).await;
    info!(
        lat = args.lat,
        lng = args.lng,
        valid = result.valid,
        violation = result.violation.map(|v| v.as_str()),
        "Point checked"
    );
    print_json(&result)?;
    Ok(result)
}

/// Validate a path and print the result.
pub async fn run_path(engine: &Engine, args: &PathArgs) -> anyhow::Result<ValidationResult> {
    let config = args.policy.apply(engine.default_validation());
    let result = engine.validate_path(&args.points, &config).await;
    info!(
        points = args.points.len(),
        valid = result.valid,
        failed_index = result.failed_index,
        "Path checked"
    );
    print_json(&result)?;
    Ok(result)
}
