use std::fmt;

use geo::{Coord, MapCoords, MultiPolygon};
use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::error::{Stage, SurfaceError, SurfaceResult};
use crate::geom::Crs;

/// A fixed transform between two coordinate reference systems.
pub struct Reprojector {
    from: Crs,
    to: Crs,
    source: Proj4,
    target: Proj4,
    stage: Stage,
}

impl fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reprojector")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("stage", &self.stage)
            .finish()
    }
}

impl Reprojector {
    /// Build a transform `from -> to`; errors are tagged with `stage`.
    pub fn new(from: &Crs, to: &Crs, stage: Stage) -> SurfaceResult<Self> {
        let build = |crs: &Crs| Proj4::from_proj_string(crs.proj4())
            .map_err(|e| SurfaceError::Transform {
                stage,
                from: from.to_string(),
                to: to.to_string(),
                reason: format!("failed to build PROJ.4 for {crs}: {e}"),
            });

        Ok(Self {
            source: build(from)?,
            target: build(to)?,
            from: from.clone(),
            to: to.clone(),
            stage,
        })
    }

    #[inline] pub fn from(&self) -> &Crs { &self.from }

    #[inline] pub fn to(&self) -> &Crs { &self.to }

    #[inline] pub fn is_identity(&self) -> bool { self.from == self.to }

    fn error(&self, reason: String) -> SurfaceError {
        SurfaceError::Transform {
            stage: self.stage,
            from: self.from.to_string(),
            to: self.to.to_string(),
            reason,
        }
    }

    /// Transform a single coordinate. Geographic input and output are in degrees.
    pub fn coord(&self, coord: Coord<f64>) -> SurfaceResult<Coord<f64>> {
        if self.is_identity() { return Ok(coord) }

        if !coord.x.is_finite() || !coord.y.is_finite() {
            return Err(self.error(format!("non-finite input coordinate ({}, {})", coord.x, coord.y)));
        }

        // proj4rs works in radians for geographic systems.
        let mut point = if self.from.is_geographic() {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };

        transform(&self.source, &self.target, &mut point)
            .map_err(|e| self.error(format!("({}, {}): {e}", coord.x, coord.y)))?;

        let out = if self.to.is_geographic() {
            Coord { x: point.0.to_degrees(), y: point.1.to_degrees() }
        } else {
            Coord { x: point.0, y: point.1 }
        };

        if !out.x.is_finite() || !out.y.is_finite() {
            return Err(self.error(format!("({}, {}) is outside the domain of the target CRS", coord.x, coord.y)));
        }

        Ok(out)
    }

    /// Transform every coordinate of a shape. Fails on the first coordinate that cannot be mapped.
    pub fn reproject(&self, shape: &MultiPolygon<f64>) -> SurfaceResult<MultiPolygon<f64>> {
        if self.is_identity() { return Ok(shape.clone()) }
        shape.try_map_coords(|coord| self.coord(coord))
    }
}
