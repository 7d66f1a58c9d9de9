//! GeoJSON writing operations.

use anyhow::{Context, Result};
use geo::{LineString, MultiPolygon, Point};
use serde_json::{Map, Value, json};

/// Convert a MultiPolygon to a GeoJSON geometry object.
pub fn multipolygon_to_value(shape: &MultiPolygon<f64>) -> Value {
    fn ring(ls: &LineString<f64>) -> Vec<[f64; 2]> {
        ls.coords().map(|c| [c.x, c.y]).collect()
    }

    let polygons = shape.0.iter()
        .map(|polygon| std::iter::once(ring(polygon.exterior()))
            .chain(polygon.interiors().iter().map(ring))
            .collect::<Vec<_>>())
        .collect::<Vec<_>>();

    json!({
        "type": "MultiPolygon",
        "coordinates": polygons,
    })
}

/// Convert a Point to a GeoJSON geometry object.
pub fn point_to_value(point: &Point<f64>) -> Value {
    json!({ "type": "Point", "coordinates": [point.x(), point.y()] })
}

/// Wrap a geometry and properties into a GeoJSON Feature.
pub fn feature(geometry: Value, properties: Map<String, Value>) -> Value {
    json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    })
}

/// Serialize a FeatureCollection, adding any extra top-level members.
pub fn write_feature_collection(features: Vec<Value>, extra: Map<String, Value>) -> Result<Vec<u8>> {
    let mut collection = Map::new();
    collection.insert("type".into(), Value::from("FeatureCollection"));
    collection.insert("features".into(), Value::Array(features));
    collection.extend(extra);

    serde_json::to_vec(&Value::Object(collection))
        .context("[io::geojson::write] Failed to serialize GeoJSON to bytes")
}
