use std::sync::Arc;

use ahash::AHashMap;
use geo::MultiPolygon;
use log::warn;

use crate::error::{LookupKind, SurfaceError, SurfaceResult};
use crate::geom::{Crs, kernel};
use crate::io::geojson::Feature;
use crate::surface::BoundaryPolygon;

/// Output-area boundaries keyed by area code.
#[derive(Debug, Clone)]
pub struct BoundaryIndex {
    parts: AHashMap<Arc<str>, Vec<MultiPolygon<f64>>>,
    crs: Crs,
}

impl BoundaryIndex {
    /// Group features by the string value of `id_property`.
    /// Features without the property are ignored.
    pub fn from_features(features: Vec<Feature>, id_property: &str, crs: Crs) -> Self {
        let mut parts: AHashMap<Arc<str>, Vec<MultiPolygon<f64>>> = AHashMap::new();
        for feature in features {
            let Some(id) = feature.property_str(id_property) else { continue };
            parts.entry(Arc::from(id.trim())).or_default().push(feature.shape);
        }
        Self { parts, crs }
    }

    #[inline] pub fn len(&self) -> usize { self.parts.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.parts.is_empty() }

    #[inline] pub fn crs(&self) -> &Crs { &self.crs }

    /// The boundary for `code`.
    ///
    /// An area stored as several features is merged into one multipolygon.
    pub fn boundary(&self, code: &str) -> SurfaceResult<BoundaryPolygon> {
        let parts = self.parts.get(code.trim())
            .ok_or_else(|| SurfaceError::LookupMiss { kind: LookupKind::OutputArea, key: code.to_string() })?;

        let shape = match parts.as_slice() {
            [single] => single.clone(),
            _ => {
                warn!("[lookup::boundary] output area {code} has {} features; merging them", parts.len());
                kernel::union_all(parts)
            }
        };

        BoundaryPolygon::with_id(code.trim(), shape, self.crs.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Coord, Rect};
    use serde_json::{Map, Value};

    fn feature(id: &str, x: f64) -> Feature {
        let mut properties = Map::new();
        properties.insert("OA21CD".into(), Value::from(id));
        Feature {
            shape: MultiPolygon(vec![Rect::new(Coord { x, y: 0.0 }, Coord { x: x + 10.0, y: 10.0 }).to_polygon()]),
            properties,
        }
    }

    #[test]
    fn finds_boundary_by_code() {
        let index = BoundaryIndex::from_features(
            vec![feature("E00000001", 0.0), feature("E00000002", 20.0)],
            "OA21CD",
            Crs::BritishNationalGrid,
        );
        let boundary = index.boundary("E00000002").unwrap();
        assert_eq!(boundary.id(), Some("E00000002"));
        assert!((boundary.area() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn missing_code_is_lookup_miss() {
        let index = BoundaryIndex::from_features(vec![feature("E00000001", 0.0)], "OA21CD", Crs::Wgs84);
        let err = index.boundary("E09999999").unwrap_err();
        assert!(matches!(err, SurfaceError::LookupMiss { kind: LookupKind::OutputArea, .. }));
    }

    #[test]
    fn multi_part_areas_are_merged() {
        let index = BoundaryIndex::from_features(
            vec![feature("E00000001", 0.0), feature("E00000001", 30.0)],
            "OA21CD",
            Crs::BritishNationalGrid,
        );
        assert_eq!(index.len(), 1);
        assert!((index.boundary("E00000001").unwrap().area() - 200.0).abs() < 1e-9);
    }
}
