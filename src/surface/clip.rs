use std::cmp::Ordering;

use geo::{BoundingRect, MultiPolygon};
use log::debug;

use crate::error::{Stage, SurfaceError, SurfaceResult};
use crate::geom::kernel;
use crate::surface::{BoundaryPolygon, CandidateLayer, ClippedLayer};

/// Intersect every shape of `layer` with `boundary`.
///
/// Both inputs must share a CRS. Shapes whose intersection is empty are
/// dropped. Any structurally invalid shape in the layer fails the whole clip,
/// even if it lies outside the boundary.
pub fn clip(layer: &CandidateLayer, boundary: &BoundaryPolygon) -> SurfaceResult<ClippedLayer> {
    if layer.crs() != boundary.crs() {
        return Err(SurfaceError::Geometry {
            stage: Stage::Clip,
            context: format!("{} layer", layer.class()),
            reason: format!("layer CRS {} does not match boundary CRS {}", layer.crs(), boundary.crs()),
        });
    }

    let shapes = layer.geoms().shapes();
    for (i, shape) in shapes.iter().enumerate() {
        kernel::validate(shape, Stage::Clip, &format!("{}[{i}]", layer.class()))?;
    }

    let Some(envelope) = boundary.shape().bounding_rect() else {
        return Ok(ClippedLayer::new(layer.class(), Vec::new(), boundary.crs().clone()));
    };

    let candidates = layer.geoms().query(&envelope);
    let mut pieces = candidates.iter()
        .map(|&i| kernel::intersection(&shapes[i], boundary.shape()))
        .filter(|piece| kernel::area(piece) > 0.0)
        .collect::<Vec<_>>();
    pieces.sort_by(canonical_order);

    debug!(
        "[surface::clip] {}: {} shapes, {} near boundary, {} kept",
        layer.class(), shapes.len(), candidates.len(), pieces.len(),
    );

    Ok(ClippedLayer::new(layer.class(), pieces, boundary.crs().clone()))
}

/// Total order on shapes by bounding box then area, independent of input order.
fn canonical_order(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> Ordering {
    let key = |shape: &MultiPolygon<f64>| {
        let rect = shape.bounding_rect();
        [
            rect.map_or(0.0, |r| r.min().x),
            rect.map_or(0.0, |r| r.min().y),
            rect.map_or(0.0, |r| r.max().x),
            rect.map_or(0.0, |r| r.max().y),
            kernel::area(shape),
        ]
    };
    key(a).iter().zip(key(b).iter())
        .map(|(x, y)| x.total_cmp(y))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}
