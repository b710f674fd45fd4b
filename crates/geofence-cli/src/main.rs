//! # geofence CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use std::process::ExitCode;

use clap::Parser;

use geofence_cli::{config, regions, validate, GlobalArgs};

/// Geofence engine CLI — validate coordinates against national and
/// administrative boundaries.
#[derive(Parser, Debug)]
#[command(name = "geofence", version, about)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Validate a single coordinate.
    Point(validate::PointArgs),
    /// Validate an ordered list of coordinates.
    Path(validate::PathArgs),
    /// List known administrative regions.
    Regions,
    /// Name the region containing a coordinate.
    Locate(regions::LocateArgs),
    /// Validate and print the effective configuration.
    Config,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.global.log_json);
    tracing::debug!(command = ?cli.command, "Dispatching command");

    let valid = match &cli.command {
        Commands::Config => {
            config::run(&cli.global)?;
            true
        }
        Commands::Point(args) => {
            let engine = cli.global.build_engine()?;
            validate::run_point(&engine, args).await?.valid
        }
        Commands::Path(args) => {
            let engine = cli.global.build_engine()?;
            validate::run_path(&engine, args).await?.valid
        }
        Commands::Regions => {
            let engine = cli.global.build_engine()?;
            regions::run_list(&engine).await?;
            true
        }
        Commands::Locate(args) => {
            let engine = cli.global.build_engine()?;
            regions::run_locate(&engine, args).await?;
            true
        }
    };

    Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_path_with_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "geofence", "--data-dir", "/data", "path", "--point", "-3.5,10", "--point", "1,-2",
            "--region", "A",
        ])
        .unwrap();
        match cli.command {
            Commands::Path(args) => {
                assert_eq!(args.points.len(), 2);
                assert_eq!(args.points[0].latitude, -3.5);
                assert_eq!(args.policy.regions, vec!["A"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_point_negative_lat() {
        let cli = Cli::try_parse_from(["geofence", "point", "--lat", "-12.5", "--lng", "130"]).unwrap();
        assert!(matches!(cli.command, Commands::Point(ref a) if a.lat == -12.5));
    }

    #[test]
    fn test_data_dir_conflicts_with_url() {
        assert!(Cli::try_parse_from([
            "geofence", "--data-dir", "/d", "--data-url", "https://x", "regions",
        ])
        .is_err());
    }
}
