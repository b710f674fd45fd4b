//! # Feature Parsing
//!
//! Decodes the nested-coordinate geographic format (GeoJSON-style) into
//! [`BoundaryFeature`]s. Accepted document shapes:
//!
//! - a `FeatureCollection` object (`{"features": [...]}`);
//! - a bare array of features;
//! - a single `Feature` object.
//!
//! Positions are `[longitude, latitude, ...]`; trailing elements such as
//! altitude are ignored. Only `Polygon` and `MultiPolygon` geometries are
//! kept. Features with any other geometry type, or none, are skipped with a
//! warning. Any out-of-range or non-finite position rejects the whole
//! dataset, so a corrupt file never loads half a country.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use geofence_core::{BoundaryFeature, Coordinate, Geometry, MultiPolygon, Polygon, Ring};

use crate::error::BoundaryError;

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Collection { features: Vec<RawFeature> },
    Features(Vec<RawFeature>),
    Feature(RawFeature),
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

type Position = Vec<f64>;

/// Parse `bytes` into named features.
///
/// A feature's name is the first of `name_properties` present on it as a
/// string or number; otherwise it is named `region-<index>` after its
/// position in the document.
pub fn parse_features(
    dataset: &str,
    bytes: &[u8],
    name_properties: &[String],
) -> Result<Vec<BoundaryFeature>, BoundaryError> {
    let doc: Document = serde_json::from_slice(bytes)
        .map_err(|e| BoundaryError::parse(dataset, format!("not a feature document: {e}")))?;

    let raw = match doc {
        Document::Collection { features } | Document::Features(features) => features,
        Document::Feature(feature) => vec![feature],
    };

    let mut features = Vec::with_capacity(raw.len());
    for (index, feature) in raw.into_iter().enumerate() {
        let name = feature_name(feature.properties.as_ref(), name_properties)
            .unwrap_or_else(|| format!("region-{index}"));

        let Some(geometry) = feature.geometry else {
            warn!(dataset, feature = %name, "Skipping feature without geometry");
            continue;
        };

        let geometry = match geometry.kind.as_str() {
            "Polygon" => {
                let rings: Vec<Vec<Position>> = decode(dataset, &name, geometry.coordinates)?;
                Geometry::Polygon(polygon(dataset, &name, rings)?)
            }
            "MultiPolygon" => {
                let polys: Vec<Vec<Vec<Position>>> = decode(dataset, &name, geometry.coordinates)?;
                let polygons = polys
                    .into_iter()
                    .map(|rings| polygon(dataset, &name, rings))
                    .collect::<Result<Vec<_>, _>>()?;
                Geometry::MultiPolygon(MultiPolygon::new(polygons))
            }
            other => {
                warn!(dataset, feature = %name, geometry_type = other, "Skipping non-polygon feature");
                continue;
            }
        };

        features.push(BoundaryFeature::new(name, geometry));
    }
    Ok(features)
}

fn feature_name(properties: Option<&Map<String, Value>>, keys: &[String]) -> Option<String> {
    let properties = properties?;
    keys.iter().find_map(|key| match properties.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn decode<T: serde::de::DeserializeOwned>(
    dataset: &str,
    feature: &str,
    coordinates: Value,
) -> Result<T, BoundaryError> {
    serde_json::from_value(coordinates).map_err(|e| {
        BoundaryError::parse(dataset, format!("feature {feature:?} has malformed coordinates: {e}"))
    })
}

fn polygon(dataset: &str, feature: &str, rings: Vec<Vec<Position>>) -> Result<Polygon, BoundaryError> {
    let mut rings = rings
        .into_iter()
        .map(|ring| ring_from_positions(dataset, feature, ring))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter();

    let outer = rings.next().ok_or_else(|| {
        BoundaryError::parse(dataset, format!("feature {feature:?} has a polygon with no rings"))
    })?;
    Ok(Polygon::new(outer, rings.collect()))
}

fn ring_from_positions(dataset: &str, feature: &str, positions: Vec<Position>) -> Result<Ring, BoundaryError> {
    positions
        .into_iter()
        .map(|pos| {
            let (lng, lat) = match pos.as_slice() {
                [lng, lat, ..] => (*lng, *lat),
                _ => {
                    return Err(BoundaryError::parse(
                        dataset,
                        format!("feature {feature:?} has a position with fewer than two values"),
                    ))
                }
            };
            let coord = Coordinate::from_lng_lat(lng, lat);
            coord.validate().map_err(|e| {
                BoundaryError::parse(dataset, format!("feature {feature:?}: {e}"))
            })?;
            Ok(coord)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Ring::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;

    fn names() -> Vec<String> {
        vec!["name".to_string(), "NAME_1".to_string()]
    }

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"name": "North"},
                "geometry": {"type": "Polygon", "coordinates": [[[0,5],[10,5],[10,10],[0,10],[0,5]]]}
            },
            {
                "type": "Feature",
                "properties": {"NAME_1": "Islands"},
                "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[20,0],[21,0],[21,1],[20,1]]],
                    [[[22,0],[23,0],[23,1],[22,1]], [[22.4,0.4],[22.6,0.4],[22.6,0.6],[22.4,0.6]]]
                ]}
            }
        ]
    }"#;

    #[test]
    fn test_parse_feature_collection() {
        let features = parse_features("regions", COLLECTION.as_bytes(), &names()).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].name, "North");
        assert_eq!(features[1].name, "Islands");

        // [lng, lat] order: the first vertex of North is lat 5, lng 0.
        let Geometry::Polygon(north) = &features[0].geometry else {
            panic!("expected polygon");
        };
        assert_eq!(north.outer.vertices()[0], Coordinate::new(5.0, 0.0));

        let Geometry::MultiPolygon(islands) = &features[1].geometry else {
            panic!("expected multipolygon");
        };
        assert_eq!(islands.polygons().len(), 2);
        assert_eq!(islands.polygons()[1].holes.len(), 1);
    }

    #[test]
    fn test_parse_bare_array_and_single_feature() {
        let array = r#"[{"properties": {"name": "A"}, "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1]]]}}]"#;
        let single = r#"{"type": "Feature", "properties": {"name": "B"}, "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1]]]}}"#;
        assert_eq!(parse_features("d", array.as_bytes(), &names()).unwrap()[0].name, "A");
        assert_eq!(parse_features("d", single.as_bytes(), &names()).unwrap()[0].name, "B");
    }

    #[test]
    fn test_unnamed_feature_gets_positional_name() {
        let doc = r#"[
            {"geometry": {"type": "Point", "coordinates": [0, 0]}},
            {"properties": {"code": 7}, "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1]]]}}
        ]"#;
        let features = parse_features("d", doc.as_bytes(), &names()).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].name, "region-1");
    }

    #[test]
    fn test_numeric_name_property() {
        let doc = r#"[{"properties": {"name": 42}, "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1]]]}}]"#;
        assert_eq!(parse_features("d", doc.as_bytes(), &names()).unwrap()[0].name, "42");
    }

    #[test]
    fn test_altitude_ignored() {
        let doc = r#"[{"properties": {"name": "Z"}, "geometry": {"type": "Polygon", "coordinates": [[[0,0,100],[1,0,100],[1,1,100]]]}}]"#;
        let features = parse_features("d", doc.as_bytes(), &names()).unwrap();
        assert_eq!(features[0].geometry.polygons()[0].outer.len(), 3);
    }

    #[test]
    fn test_out_of_range_position_rejects_dataset() {
        let doc = r#"[{"properties": {"name": "Bad"}, "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,95],[1,1]]]}}]"#;
        let err = parse_features("d", doc.as_bytes(), &names()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
        assert!(err.to_string().contains("Bad"));
    }

    #[test]
    fn test_short_position_rejected() {
        let doc = r#"[{"properties": {"name": "Short"}, "geometry": {"type": "Polygon", "coordinates": [[[0],[1,0],[1,1]]]}}]"#;
        assert!(parse_features("d", doc.as_bytes(), &names()).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let err = parse_features("d", b"not json", &names()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
    }

    #[test]
    fn test_polygon_without_rings_rejected() {
        let doc = r#"[{"properties": {"name": "Hollow"}, "geometry": {"type": "Polygon", "coordinates": []}}]"#;
        assert!(parse_features("d", doc.as_bytes(), &names()).is_err());
    }
}
