use log::{debug, info, warn};

use crate::error::{Stage, SurfaceResult};
use crate::geom::{Crs, PlanarStrategy, Reprojector};
use crate::surface::{
    AreaReport, BoundaryPolygon, CandidateLayer, ClassUnions, DisplayGeometries, Tolerance,
    classify, clip, report,
};

/// Everything one classification run produces.
#[derive(Debug, Clone)]
pub struct SurfaceAnalysis {
    /// Working CRS the areas were measured in.
    pub planar_crs: Crs,
    /// Boundary in the working CRS.
    pub boundary: BoundaryPolygon,
    /// Class geometries in the working CRS.
    pub unions: ClassUnions,
    pub report: AreaReport,
    /// Class geometries and boundary in WGS84 for display.
    pub display: DisplayGeometries,
}

/// Synchronous classification pipeline:
/// reproject -> clip -> classify -> account -> display.
///
/// Holds no per-request state, so one pipeline can serve concurrent runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfacePipeline {
    strategy: PlanarStrategy,
    tolerance: Tolerance,
}

impl SurfacePipeline {
    pub fn new(strategy: PlanarStrategy, tolerance: Tolerance) -> Self {
        Self { strategy, tolerance }
    }

    #[inline] pub fn strategy(&self) -> PlanarStrategy { self.strategy }

    #[inline] pub fn tolerance(&self) -> Tolerance { self.tolerance }

    /// The working planar CRS for `boundary`.
    pub fn planar_crs(&self, boundary: &BoundaryPolygon) -> SurfaceResult<Crs> {
        Ok(self.strategy.planar_crs(boundary.geodetic_center()?))
    }

    /// Classify the surface inside `boundary`.
    ///
    /// Inputs may be in any supported CRS; they are reprojected once into the
    /// working planar CRS. Fails fast: no partial report is ever returned.
    pub fn run(
        &self,
        boundary: &BoundaryPolygon,
        buildings: &CandidateLayer,
        car_parks: &CandidateLayer,
        greenspace: &CandidateLayer,
    ) -> SurfaceResult<SurfaceAnalysis> {
        let planar_crs = self.planar_crs(boundary)?;
        debug!("[surface::pipeline] working CRS {planar_crs}");

        // Reproject everything once.
        let to_planar = |crs: &Crs| Reprojector::new(crs, &planar_crs, Stage::Reproject);
        let boundary = boundary.reproject(&to_planar(boundary.crs())?)?;
        let buildings = buildings.reproject(&to_planar(buildings.crs())?)?;
        let car_parks = car_parks.reproject(&to_planar(car_parks.crs())?)?;
        let greenspace = greenspace.reproject(&to_planar(greenspace.crs())?)?;

        let buildings = clip(&buildings, &boundary)?;
        let car_parks = clip(&car_parks, &boundary)?;
        let greenspace = clip(&greenspace, &boundary)?;

        let unions = classify(&boundary, &buildings, &car_parks, &greenspace)?;
        let report = report(&boundary, &unions)?;

        if !report.is_conserved(&self.tolerance) {
            warn!(
                "[surface::pipeline] class areas sum to {:.6} m² but boundary is {:.6} m²",
                report.total_area(), report.boundary_area_m2,
            );
        }

        let to_display = Reprojector::new(&planar_crs, &Crs::Wgs84, Stage::Display)?;
        let display = DisplayGeometries::project(&unions, &boundary, &to_display)?;

        info!(
            "[surface::pipeline] {}: {:.0} m² classified",
            boundary.id().unwrap_or("boundary"), report.boundary_area_m2,
        );

        Ok(SurfaceAnalysis { planar_crs, boundary, unions, report, display })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SurfaceError;
    use crate::surface::SurfaceClass;
    use geo::{Coord, LineString, MultiPolygon, Polygon, Rect};

    fn lonlat_rect(x0: f64, y0: f64, x1: f64, y1: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![Rect::new(Coord { x: x0, y: y0 }, Coord { x: x1, y: y1 }).to_polygon()])
    }

    #[test]
    fn runs_on_wgs84_inputs() {
        let boundary = BoundaryPolygon::new(lonlat_rect(-0.101, 51.500, -0.099, 51.502), Crs::Wgs84).unwrap();
        let buildings = CandidateLayer::buildings(vec![lonlat_rect(-0.101, 51.500, -0.100, 51.502)], Crs::Wgs84);
        let car_parks = CandidateLayer::car_parks(vec![], Crs::Wgs84);
        let greenspace = CandidateLayer::greenspace(vec![lonlat_rect(-0.1005, 51.500, -0.0995, 51.502)], Crs::Wgs84);

        let analysis = SurfacePipeline::default().run(&boundary, &buildings, &car_parks, &greenspace).unwrap();
        let report = &analysis.report;

        assert!(report.is_conserved(&Tolerance::default()));
        assert!((report.get(SurfaceClass::Building).percentage - 50.0).abs() < 0.01);
        assert!((report.get(SurfaceClass::Greenspace).percentage - 25.0).abs() < 0.01);
        assert_eq!(report.get(SurfaceClass::CarPark).area_m2, 0.0);
        assert!(analysis.display.get(SurfaceClass::CarPark).is_none());

        // Display geometries come back in lon/lat.
        let centroid = analysis.display.centroid;
        assert!((centroid.x() + 0.100).abs() < 1e-6);
        assert!((centroid.y() - 51.501).abs() < 1e-6);
    }

    #[test]
    fn zero_area_boundary_is_rejected() {
        let flat = MultiPolygon(vec![Polygon::new(
            LineString::from(vec![(-0.1, 51.5), (-0.09, 51.5), (-0.08, 51.5), (-0.1, 51.5)]),
            vec![],
        )]);
        let err = BoundaryPolygon::new(flat, Crs::Wgs84).unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidBoundary { .. }));
    }

    #[test]
    fn out_of_domain_layer_is_a_transform_error() {
        let boundary = BoundaryPolygon::new(lonlat_rect(-0.101, 51.500, -0.099, 51.502), Crs::Wgs84).unwrap();
        // The pole has no finite Web Mercator y.
        let buildings = CandidateLayer::buildings(vec![lonlat_rect(-0.1, 89.0, 0.0, 90.0)], Crs::Wgs84);
        let empty = |layer: fn(Vec<MultiPolygon<f64>>, Crs) -> CandidateLayer| layer(vec![], Crs::Wgs84);

        let err = SurfacePipeline::new(PlanarStrategy::WebMercator, Tolerance::default())
            .run(&boundary, &buildings, &empty(CandidateLayer::car_parks), &empty(CandidateLayer::greenspace))
            .unwrap_err();
        assert_eq!(err.stage(), Stage::Reproject);
    }
}
