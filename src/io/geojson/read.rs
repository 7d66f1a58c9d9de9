//! GeoJSON reading operations.

use anyhow::{Context, Result, anyhow, bail};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use log::debug;
use serde_json::{Map, Value};

/// A polygonal feature with its properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub shape: MultiPolygon<f64>,
    pub properties: Map<String, Value>,
}

impl Feature {
    /// A property rendered as a string (numbers and booleans are stringified).
    pub fn property_str(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

/// Features of a FeatureCollection plus the EPSG code it declares, if any.
#[derive(Debug, Clone, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
    pub epsg: Option<u32>,
}

/// Read polygonal features from GeoJSON bytes.
///
/// Accepts a FeatureCollection, a single Feature, or a bare geometry.
/// Features without geometry or with non-areal geometry are skipped.
pub fn read_geojson_bytes(bytes: &[u8]) -> Result<FeatureCollection> {
    let value: Value = serde_json::from_slice(bytes)
        .context("[io::geojson::read] Failed to parse GeoJSON bytes")?;

    let epsg = declared_epsg(&value);
    let mut skipped = 0usize;
    let mut features = Vec::new();

    let mut push = |geometry: &Value, properties: Map<String, Value>| -> Result<()> {
        match parse_geometry(geometry)? {
            Some(shape) => features.push(Feature { shape, properties }),
            None => skipped += 1,
        }
        Ok(())
    };

    match value["type"].as_str() {
        Some("FeatureCollection") => {
            let items = value["features"].as_array()
                .ok_or_else(|| anyhow!("[io::geojson::read] FeatureCollection has no 'features' array"))?;
            for (i, feature) in items.iter().enumerate() {
                push(&feature["geometry"], properties_of(feature))
                    .with_context(|| format!("[io::geojson::read] feature {i}"))?;
            }
        }
        Some("Feature") => push(&value["geometry"], properties_of(&value))?,
        Some(_) => push(&value, Map::new())?,
        None => bail!("[io::geojson::read] GeoJSON object has no 'type'"),
    }

    if skipped > 0 {
        debug!("[io::geojson::read] skipped {skipped} non-polygonal features");
    }

    Ok(FeatureCollection { features, epsg })
}

fn properties_of(feature: &Value) -> Map<String, Value> {
    feature["properties"].as_object().cloned().unwrap_or_default()
}

/// Read the legacy `crs` member, e.g. "urn:ogc:def:crs:EPSG::27700" or "EPSG:4326".
/// CRS84 means lon/lat WGS84.
fn declared_epsg(value: &Value) -> Option<u32> {
    let name = value["crs"]["properties"]["name"].as_str()?;
    if name.ends_with("CRS84") { return Some(4326) }
    name.rsplit(':').next()?.parse().ok()
}

/// Parse a Polygon or MultiPolygon geometry; `None` for anything else.
fn parse_geometry(geometry: &Value) -> Result<Option<MultiPolygon<f64>>> {
    if geometry.is_null() { return Ok(None) }

    let coords = &geometry["coordinates"];
    match geometry["type"].as_str() {
        Some("Polygon") => Ok(Some(MultiPolygon(vec![parse_polygon(coords)?]))),
        Some("MultiPolygon") => {
            let polygons = coords.as_array()
                .ok_or_else(|| anyhow!("[io::geojson::read] MultiPolygon coordinates must be an array"))?
                .iter()
                .map(parse_polygon)
                .collect::<Result<Vec<_>>>()?;
            Ok(Some(MultiPolygon(polygons)))
        }
        _ => Ok(None),
    }
}

/// Parse polygon coordinates: [exterior, hole, hole, ...].
fn parse_polygon(coords: &Value) -> Result<Polygon<f64>> {
    let rings = coords.as_array()
        .ok_or_else(|| anyhow!("[io::geojson::read] Polygon coordinates must be an array of rings"))?;

    let Some((exterior, interiors)) = rings.split_first() else {
        return Ok(Polygon::new(LineString(Vec::new()), Vec::new()));
    };

    Ok(Polygon::new(
        parse_ring(exterior)?,
        interiors.iter().map(parse_ring).collect::<Result<Vec<_>>>()?,
    ))
}

/// Parse a ring: [[x, y], [x, y], ...]. Extra ordinates (z, m) are dropped.
fn parse_ring(coords: &Value) -> Result<LineString<f64>> {
    let positions = coords.as_array()
        .ok_or_else(|| anyhow!("[io::geojson::read] ring must be an array of positions"))?;

    let mut points = Vec::with_capacity(positions.len());
    for position in positions {
        let x = position[0].as_f64()
            .ok_or_else(|| anyhow!("[io::geojson::read] Invalid coordinate: x must be a number"))?;
        let y = position[1].as_f64()
            .ok_or_else(|| anyhow!("[io::geojson::read] Invalid coordinate: y must be a number"))?;
        points.push(Coord { x, y });
    }

    // Ensure ring is closed (first point == last point)
    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if first != last { points.push(*first) }
    }

    Ok(LineString(points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;

    #[test]
    fn reads_polygons_and_multipolygons() {
        let bytes = br#"{
            "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::27700" } },
            "features": [
                { "type": "Feature", "properties": { "OA21CD": "E00000001" },
                  "geometry": { "type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2],[0,0]]] } },
                { "type": "Feature", "properties": { "OA21CD": "E00000002" },
                  "geometry": { "type": "MultiPolygon", "coordinates": [
                      [[[0,0],[1,0],[1,1],[0,1]]],
                      [[[5,5],[6,5],[6,6],[5,6],[5,5]]]
                  ] } },
                { "type": "Feature", "properties": {},
                  "geometry": { "type": "Point", "coordinates": [1, 1] } },
                { "type": "Feature", "properties": {}, "geometry": null }
            ]
        }"#;

        let collection = read_geojson_bytes(bytes).unwrap();
        assert_eq!(collection.epsg, Some(27700));
        assert_eq!(collection.features.len(), 2);
        assert_eq!(collection.features[0].property_str("OA21CD").as_deref(), Some("E00000001"));
        assert!((collection.features[0].shape.unsigned_area() - 4.0).abs() < 1e-12);
        // Unclosed ring is closed on read.
        assert_eq!(collection.features[1].shape.0[0].exterior().0.len(), 5);
        assert!((collection.features[1].shape.unsigned_area() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn reads_holes() {
        let bytes = br#"{ "type": "Polygon", "coordinates": [
            [[0,0],[10,0],[10,10],[0,10],[0,0]],
            [[2,2],[4,2],[4,4],[2,4],[2,2]]
        ] }"#;
        let collection = read_geojson_bytes(bytes).unwrap();
        assert_eq!(collection.epsg, None);
        assert!((collection.features[0].shape.unsigned_area() - 96.0).abs() < 1e-12);
    }

    #[test]
    fn crs84_is_wgs84() {
        let bytes = br#"{ "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:OGC:1.3:CRS84" } },
            "features": [] }"#;
        assert_eq!(read_geojson_bytes(bytes).unwrap().epsg, Some(4326));
    }

    #[test]
    fn malformed_coordinates_are_errors() {
        let bytes = br#"{ "type": "Polygon", "coordinates": [[[0,0],["a",0],[1,1],[0,0]]] }"#;
        assert!(read_geojson_bytes(bytes).is_err());
        assert!(read_geojson_bytes(b"not json").is_err());
    }

    #[test]
    fn numeric_properties_are_stringified() {
        let bytes = br#"{ "type": "Feature", "properties": { "id": 42 },
            "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } }"#;
        let collection = read_geojson_bytes(bytes).unwrap();
        assert_eq!(collection.features[0].property_str("id").as_deref(), Some("42"));
    }
}
