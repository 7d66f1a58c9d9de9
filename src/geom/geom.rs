use geo::{BoundingRect, MultiPolygon, Rect};
use rstar::{AABB, RTree, primitives::{GeomWithData, Rectangle}};

use crate::error::SurfaceResult;
use crate::geom::{Crs, Reprojector};

/// Bounding rectangle of a shape, tagged with the shape's index.
type IndexedBox = GeomWithData<Rectangle<[f64; 2]>, usize>;

/// Geometries is a collection of (possibly overlapping) MultiPolygons in one CRS,
/// indexed by bounding box.
#[derive(Debug, Clone)]
pub struct Geometries {
    shapes: Vec<MultiPolygon<f64>>,
    rtree: RTree<IndexedBox>,
    crs: Crs,
}

impl Geometries {
    /// Construct a Geometries object from a vector of MultiPolygons.
    /// Empty shapes and shapes with non-finite bounds are never returned by `query`.
    pub fn new(shapes: Vec<MultiPolygon<f64>>, crs: Crs) -> Self {
        let finite = |rect: &Rect<f64>| [rect.min().x, rect.min().y, rect.max().x, rect.max().y]
            .iter().all(|v| v.is_finite());

        Self {
            rtree: RTree::bulk_load(
                shapes.iter().enumerate()
                    .filter_map(|(i, shape)| shape.bounding_rect().map(|rect| (i, rect)))
                    .filter(|(_, rect)| finite(rect))
                    .map(|(i, rect)| IndexedBox::new(Rectangle::from_corners(rect.min().into(), rect.max().into()), i))
                    .collect()
            ),
            shapes,
            crs,
        }
    }

    /// Get the number of MultiPolygons.
    #[inline] pub fn len(&self) -> usize { self.shapes.len() }

    /// Check if there are no MultiPolygons.
    #[inline] pub fn is_empty(&self) -> bool { self.shapes.is_empty() }

    /// Get a reference to the list of MultiPolygons.
    #[inline] pub fn shapes(&self) -> &[MultiPolygon<f64>] { &self.shapes }

    /// Get the coordinate reference system of the shapes.
    #[inline] pub fn crs(&self) -> &Crs { &self.crs }

    /// Indices of shapes whose bounding box intersects `rect`, in ascending order.
    pub fn query(&self, rect: &Rect<f64>) -> Vec<usize> {
        let envelope = AABB::from_corners(rect.min().into(), rect.max().into());
        let mut hits = self.rtree.locate_in_envelope_intersecting(&envelope)
            .map(|entry| entry.data)
            .collect::<Vec<_>>();
        hits.sort_unstable();
        hits
    }

    /// Reproject every shape, rebuilding the index in the target CRS.
    pub fn reproject(&self, proj: &Reprojector) -> SurfaceResult<Self> {
        let shapes = self.shapes.iter()
            .map(|shape| proj.reproject(shape))
            .collect::<SurfaceResult<Vec<_>>>()?;
        Ok(Self::new(shapes, proj.to().clone()))
    }
}
