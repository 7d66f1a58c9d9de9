use std::sync::Arc;

use geo::{Coord, MultiPolygon};

use crate::error::{Stage, SurfaceError, SurfaceResult};
use crate::geom::{Crs, Geometries, Reprojector, kernel};
use crate::surface::SurfaceClass;

/// The administrative area being classified.
///
/// Always non-empty with a finite, positive area in its own CRS.
#[derive(Debug, Clone)]
pub struct BoundaryPolygon {
    id: Option<Arc<str>>,
    shape: MultiPolygon<f64>,
    crs: Crs,
}

impl BoundaryPolygon {
    /// Wrap a shape, rejecting missing or degenerate boundaries.
    pub fn new(shape: MultiPolygon<f64>, crs: Crs) -> SurfaceResult<Self> {
        Self::checked(None, shape, crs, Stage::Classify)
    }

    /// Same as `new`, tagging the boundary with its output-area code.
    pub fn with_id(id: impl Into<Arc<str>>, shape: MultiPolygon<f64>, crs: Crs) -> SurfaceResult<Self> {
        Self::checked(Some(id.into()), shape, crs, Stage::Classify)
    }

    fn checked(id: Option<Arc<str>>, shape: MultiPolygon<f64>, crs: Crs, stage: Stage) -> SurfaceResult<Self> {
        let context = match &id {
            Some(id) => format!("boundary {id}"),
            None => "boundary".to_string(),
        };
        kernel::validate(&shape, stage, &context)?;

        if kernel::is_empty(&shape) {
            return Err(SurfaceError::InvalidBoundary { stage, reason: format!("{context} is empty") });
        }
        let area = kernel::area(&shape);
        if !(area.is_finite() && area > 0.0) {
            return Err(SurfaceError::InvalidBoundary {
                stage,
                reason: format!("{context} has non-positive area {area}"),
            });
        }

        Ok(Self { id, shape, crs })
    }

    #[inline] pub fn id(&self) -> Option<&str> { self.id.as_deref() }

    #[inline] pub fn shape(&self) -> &MultiPolygon<f64> { &self.shape }

    #[inline] pub fn crs(&self) -> &Crs { &self.crs }

    /// Area in the units of the boundary's CRS.
    #[inline] pub fn area(&self) -> f64 { kernel::area(&self.shape) }

    /// Reproject, re-checking that the boundary did not collapse.
    pub fn reproject(&self, proj: &Reprojector) -> SurfaceResult<Self> {
        let shape = proj.reproject(&self.shape)?;
        Self::checked(self.id.clone(), shape, proj.to().clone(), Stage::Reproject)
    }

    /// Centroid in lon/lat degrees, used to centre the working planar CRS.
    pub fn geodetic_center(&self) -> SurfaceResult<Coord<f64>> {
        let centroid = kernel::centroid(&self.shape)
            .ok_or_else(|| SurfaceError::InvalidBoundary {
                stage: Stage::Reproject,
                reason: "boundary has no centroid".into(),
            })?;
        Reprojector::new(&self.crs, &Crs::Wgs84, Stage::Reproject)?.coord(centroid.0)
    }
}

/// One raw source layer (buildings, car parks or greenspace).
/// Input order carries no meaning.
#[derive(Debug, Clone)]
pub struct CandidateLayer {
    class: SurfaceClass,
    geoms: Geometries,
}

impl CandidateLayer {
    fn new(class: SurfaceClass, shapes: Vec<MultiPolygon<f64>>, crs: Crs) -> Self {
        Self { class, geoms: Geometries::new(shapes, crs) }
    }

    pub fn buildings(shapes: Vec<MultiPolygon<f64>>, crs: Crs) -> Self {
        Self::new(SurfaceClass::Building, shapes, crs)
    }

    pub fn car_parks(shapes: Vec<MultiPolygon<f64>>, crs: Crs) -> Self {
        Self::new(SurfaceClass::CarPark, shapes, crs)
    }

    pub fn greenspace(shapes: Vec<MultiPolygon<f64>>, crs: Crs) -> Self {
        Self::new(SurfaceClass::Greenspace, shapes, crs)
    }

    #[inline] pub fn class(&self) -> SurfaceClass { self.class }

    #[inline] pub fn geoms(&self) -> &Geometries { &self.geoms }

    #[inline] pub fn crs(&self) -> &Crs { self.geoms.crs() }

    #[inline] pub fn len(&self) -> usize { self.geoms.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.geoms.is_empty() }

    /// Reproject every shape into another CRS.
    ///
    /// Shapes are validated in their source CRS first, so malformed input is a
    /// geometry error rather than a failed transform.
    pub fn reproject(&self, proj: &Reprojector) -> SurfaceResult<Self> {
        for (i, shape) in self.geoms.shapes().iter().enumerate() {
            kernel::validate(shape, Stage::Clip, &format!("{}[{i}]", self.class))?;
        }
        Ok(Self { class: self.class, geoms: self.geoms.reproject(proj)? })
    }
}

/// A candidate layer intersected with the boundary.
///
/// Pieces are non-empty and sorted by a canonical key, so unions over them
/// do not depend on the input order of the source layer.
#[derive(Debug, Clone)]
pub struct ClippedLayer {
    class: SurfaceClass,
    pieces: Vec<MultiPolygon<f64>>,
    crs: Crs,
}

impl ClippedLayer {
    pub(crate) fn new(class: SurfaceClass, pieces: Vec<MultiPolygon<f64>>, crs: Crs) -> Self {
        Self { class, pieces, crs }
    }

    #[inline] pub fn class(&self) -> SurfaceClass { self.class }

    #[inline] pub fn pieces(&self) -> &[MultiPolygon<f64>] { &self.pieces }

    #[inline] pub fn crs(&self) -> &Crs { &self.crs }

    #[inline] pub fn len(&self) -> usize { self.pieces.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.pieces.is_empty() }

    /// Union of all pieces; empty for an empty layer.
    pub fn union(&self) -> MultiPolygon<f64> {
        kernel::union_all(&self.pieces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, Polygon, Rect};

    fn square(size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: size, y: size }).to_polygon()])
    }

    #[test]
    fn boundary_requires_positive_area() {
        assert!(BoundaryPolygon::new(square(10.0), Crs::BritishNationalGrid).is_ok());

        let err = BoundaryPolygon::new(MultiPolygon(vec![]), Crs::BritishNationalGrid).unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidBoundary { .. }));

        let flat = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 0.0)]),
            vec![],
        )]);
        let err = BoundaryPolygon::with_id("E00000001", flat, Crs::BritishNationalGrid).unwrap_err();
        assert!(err.to_string().contains("E00000001"));
    }

    #[test]
    fn geodetic_center_of_wgs84_boundary_is_its_centroid() {
        let shape = MultiPolygon(vec![Rect::new(
            Coord { x: -0.2, y: 51.4 },
            Coord { x: 0.0, y: 51.6 },
        ).to_polygon()]);
        let boundary = BoundaryPolygon::new(shape, Crs::Wgs84).unwrap();
        let center = boundary.geodetic_center().unwrap();
        assert!((center.x + 0.1).abs() < 1e-9);
        assert!((center.y - 51.5).abs() < 1e-9);
    }

    #[test]
    fn candidate_layers_know_their_class() {
        let layer = CandidateLayer::car_parks(vec![square(1.0)], Crs::Wgs84);
        assert_eq!(layer.class(), SurfaceClass::CarPark);
        assert_eq!(layer.len(), 1);
        assert!(!layer.is_empty());
    }

    #[test]
    fn malformed_layer_shape_is_rejected_before_reprojecting() {
        let broken = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(0.0, 0.0), (f64::INFINITY, 0.0), (1.0, 1.0), (0.0, 0.0)]),
            vec![],
        )]);
        let layer = CandidateLayer::buildings(vec![square(1.0), broken], Crs::BritishNationalGrid);
        let proj = Reprojector::new(&Crs::BritishNationalGrid, &Crs::Wgs84, Stage::Reproject).unwrap();

        let err = layer.reproject(&proj).unwrap_err();
        match err {
            SurfaceError::Geometry { stage, context, .. } => {
                assert_eq!(stage, Stage::Clip);
                assert_eq!(context, "building[1]");
            }
            other => panic!("expected a geometry error, got {other}"),
        }
    }
}
