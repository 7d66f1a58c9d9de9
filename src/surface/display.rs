use anyhow::Result;
use geo::{MultiPolygon, Point};
use serde_json::{Map, Value};

use crate::error::{Stage, SurfaceError, SurfaceResult};
use crate::geom::{Reprojector, kernel};
use crate::io::geojson::{feature, multipolygon_to_value, point_to_value, write_feature_collection};
use crate::surface::{BoundaryPolygon, ClassUnions, SurfaceClass};

/// Boundary outline colour (RGB).
const BOUNDARY_STROKE: [u8; 3] = [255, 215, 0];

/// Reproject a class geometry for display. Empty input yields `None`
/// so renderers can skip the layer instead of drawing a degenerate shape.
pub fn to_display_crs(shape: &MultiPolygon<f64>, proj: &Reprojector) -> SurfaceResult<Option<MultiPolygon<f64>>> {
    if kernel::is_empty(shape) { return Ok(None) }
    proj.reproject(shape).map(Some)
}

/// Class geometries and boundary in the display CRS.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayGeometries {
    pub classes: [Option<MultiPolygon<f64>>; 4],
    pub boundary: MultiPolygon<f64>,
    /// Boundary centroid, for initial map framing.
    pub centroid: Point<f64>,
}

impl DisplayGeometries {
    /// Project the planar results through `proj` (planar -> display).
    pub fn project(unions: &ClassUnions, boundary: &BoundaryPolygon, proj: &Reprojector) -> SurfaceResult<Self> {
        let mut classes: [Option<MultiPolygon<f64>>; 4] = Default::default();
        for (class, shape) in unions.iter() {
            classes[class.index()] = to_display_crs(shape, proj)?;
        }

        let centroid = kernel::centroid(boundary.shape())
            .ok_or_else(|| SurfaceError::InvalidBoundary {
                stage: Stage::Display,
                reason: "boundary has no centroid".into(),
            })?;

        Ok(Self {
            classes,
            boundary: proj.reproject(boundary.shape())?,
            centroid: Point(proj.coord(centroid.0)?),
        })
    }

    /// The display geometry for `class`, if it has any area.
    #[inline]
    pub fn get(&self, class: SurfaceClass) -> Option<&MultiPolygon<f64>> {
        self.classes[class.index()].as_ref()
    }

    /// FeatureCollection with one feature per present class, then the boundary,
    /// plus a top-level `centroid` point.
    pub fn to_geojson(&self) -> Result<Vec<u8>> {
        let mut features = Vec::with_capacity(5);

        for class in SurfaceClass::ALL {
            let Some(shape) = self.get(class) else { continue };
            let mut props = Map::new();
            props.insert("class".into(), Value::from(class.to_str()));
            props.insert("label".into(), Value::from(class.label()));
            props.insert("fill".into(), Value::from(class.fill().to_vec()));
            features.push(feature(multipolygon_to_value(shape), props));
        }

        let mut props = Map::new();
        props.insert("class".into(), Value::from("boundary"));
        props.insert("label".into(), Value::from("Output Area Boundary"));
        props.insert("stroke".into(), Value::from(BOUNDARY_STROKE.to_vec()));
        features.push(feature(multipolygon_to_value(&self.boundary), props));

        let mut extra = Map::new();
        extra.insert("centroid".into(), point_to_value(&self.centroid));
        write_feature_collection(features, extra)
    }
}
