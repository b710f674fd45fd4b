//! # CLI Handlers
//!
//! Runs the subcommand handlers against a temporary boundary directory.

use geofence_cli::regions::{run_list, run_locate, LocateArgs};
use geofence_cli::validate::{run_path, run_point, PathArgs, PointArgs, PolicyArgs};
use geofence_cli::{config, GlobalArgs};
use geofence_core::Coordinate;
use geofence_validator::Violation;

const NATIONAL: &str = r#"[{"properties": {"name": "Country"},
    "geometry": {"type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10]]]}}]"#;

const REGIONS: &str = r#"[
    {"properties": {"name": "A"},
     "geometry": {"type": "Polygon", "coordinates": [[[0,0],[4,0],[4,4],[0,4]]]}}
]"#;

fn global(dir: &tempfile::TempDir) -> GlobalArgs {
    std::fs::write(dir.path().join("national.geojson"), NATIONAL).unwrap();
    std::fs::write(dir.path().join("regions.json"), REGIONS).unwrap();
    GlobalArgs {
        data_dir: Some(dir.path().to_path_buf()),
        ..GlobalArgs::default()
    }
}

#[tokio::test]
async fn point_and_path_handlers() {
    let dir = tempfile::tempdir().unwrap();
    let engine = global(&dir).build_engine().unwrap();

    let ok = run_point(
        &engine,
        &PointArgs {
            lat: 5.0,
            lng: 5.0,
            policy: PolicyArgs::default(),
        },
    )
    .await
    .unwrap();
    assert!(ok.valid);

    let restricted = run_point(
        &engine,
        &PointArgs {
            lat: 5.0,
            lng: 5.0,
            policy: PolicyArgs {
                regions: vec!["A".into()],
                ..PolicyArgs::default()
            },
        },
    )
    .await
    .unwrap();
    assert_eq!(restricted.violation, Some(Violation::OutsideAssignedRegion));

    let path = run_path(
        &engine,
        &PathArgs {
            points: vec![Coordinate::new(1.0, 1.0), Coordinate::new(-1.0, 1.0)],
            policy: PolicyArgs::default(),
        },
    )
    .await
    .unwrap();
    assert_eq!(path.failed_index, Some(2));
}

#[tokio::test]
async fn region_handlers() {
    let dir = tempfile::tempdir().unwrap();
    let engine = global(&dir).build_engine().unwrap();
    assert_eq!(run_list(&engine).await.unwrap(), vec!["A"]);
    let located = run_locate(&engine, &LocateArgs { lat: 1.0, lng: 1.0 }).await.unwrap();
    assert_eq!(located.region.as_deref(), Some("A"));
}

#[test]
fn config_handler_applies_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("geofence.yaml");
    std::fs::write(
        &path,
        "source: { kind: http, base_url: https://example.org }\nunassigned_policy: unrestricted\n",
    )
    .unwrap();
    let args = GlobalArgs {
        config: Some(path),
        data_dir: Some(dir.path().to_path_buf()),
        ..GlobalArgs::default()
    };
    let cfg = config::run(&args).unwrap();
    assert_eq!(
        cfg.source,
        Some(geofence_api::SourceConfig::File {
            dir: dir.path().to_path_buf()
        })
    );
}
