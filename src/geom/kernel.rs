//! Primitive geometric operations used by the classifier.
//!
//! The empty `MultiPolygon` is the canonical empty geometry. Every operation
//! here accepts it and none of them produce NaN areas.

use geo::{Area, BooleanOps, Centroid, HasDimensions, MultiPolygon, Point, unary_union};

use crate::error::{Stage, SurfaceError, SurfaceResult};

/// The empty geometry.
#[inline]
pub fn empty() -> MultiPolygon<f64> { MultiPolygon(Vec::new()) }

/// True when the geometry has no polygon with a non-empty exterior.
#[inline]
pub fn is_empty(shape: &MultiPolygon<f64>) -> bool { shape.is_empty() }

/// Planar area; exactly 0 for an empty geometry.
#[inline]
pub fn area(shape: &MultiPolygon<f64>) -> f64 {
    if is_empty(shape) { 0.0 } else { shape.unsigned_area() }
}

/// Union of any number of shapes; empty when there are none.
pub fn union_all<'a>(shapes: impl IntoIterator<Item = &'a MultiPolygon<f64>>) -> MultiPolygon<f64> {
    let shapes = shapes.into_iter()
        .filter(|shape| !is_empty(shape))
        .collect::<Vec<_>>();

    match shapes.len() {
        0 => empty(),
        1 => shapes[0].clone(),
        _ => unary_union(shapes),
    }
}

/// `a ∪ b`, skipping the kernel when either side is empty.
pub fn union(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    match (is_empty(a), is_empty(b)) {
        (true, true) => empty(),
        (true, false) => b.clone(),
        (false, true) => a.clone(),
        (false, false) => a.union(b),
    }
}

/// `a \ b`. Subtracting an empty geometry returns `a` unchanged.
pub fn difference(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    if is_empty(a) { return empty() }
    if is_empty(b) { return a.clone() }
    a.difference(b)
}

/// `a ∩ b`; empty when either side is empty.
pub fn intersection(a: &MultiPolygon<f64>, b: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    if is_empty(a) || is_empty(b) { return empty() }
    a.intersection(b)
}

/// Area-weighted centroid, or `None` for an empty geometry.
#[inline]
pub fn centroid(shape: &MultiPolygon<f64>) -> Option<Point<f64>> {
    if is_empty(shape) { None } else { shape.centroid() }
}

/// Reject geometry the kernel cannot process. Nothing is repaired.
///
/// Checks every ring for finite coordinates, closure, and at least four
/// coordinates (a triangle plus the closing point).
pub fn validate(shape: &MultiPolygon<f64>, stage: Stage, context: &str) -> SurfaceResult<()> {
    let fail = |reason: String| SurfaceError::Geometry {
        stage,
        context: context.to_string(),
        reason,
    };

    for (p, polygon) in shape.0.iter().enumerate() {
        let rings = std::iter::once(polygon.exterior()).chain(polygon.interiors());
        for (r, ring) in rings.enumerate() {
            if ring.0.is_empty() && r == 0 { continue }

            if let Some(c) = ring.0.iter().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
                return Err(fail(format!("polygon {p} ring {r} has non-finite coordinate ({}, {})", c.x, c.y)));
            }
            if ring.0.len() < 4 {
                return Err(fail(format!("polygon {p} ring {r} has {} coordinates, need at least 4", ring.0.len())));
            }
            if !ring.is_closed() {
                return Err(fail(format!("polygon {p} ring {r} is not closed")));
            }
        }
    }

    Ok(())
}
