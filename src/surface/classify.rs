use geo::MultiPolygon;
use log::debug;

use crate::error::{Stage, SurfaceError, SurfaceResult};
use crate::geom::kernel;
use crate::surface::{BoundaryPolygon, ClippedLayer, SurfaceClass};

/// One merged geometry per surface class, pairwise non-overlapping and
/// together covering the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassUnions {
    pub building: MultiPolygon<f64>,
    pub car_park: MultiPolygon<f64>,
    pub greenspace: MultiPolygon<f64>,
    pub opportunity: MultiPolygon<f64>,
}

impl ClassUnions {
    /// The geometry assigned to `class`.
    pub fn get(&self, class: SurfaceClass) -> &MultiPolygon<f64> {
        match class {
            SurfaceClass::Building => &self.building,
            SurfaceClass::CarPark => &self.car_park,
            SurfaceClass::Greenspace => &self.greenspace,
            SurfaceClass::Opportunity => &self.opportunity,
        }
    }

    /// Iterate `(class, geometry)` in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (SurfaceClass, &MultiPolygon<f64>)> {
        SurfaceClass::ALL.into_iter().map(move |class| (class, self.get(class)))
    }
}

/// Assign every part of the boundary to exactly one class.
///
/// Precedence is strict: buildings > car park > greenspace > opportunity.
/// Each step subtracts the union of everything that outranks it, so
/// overlapping area always goes to the higher class in full.
pub fn classify(
    boundary: &BoundaryPolygon,
    buildings: &ClippedLayer,
    car_parks: &ClippedLayer,
    greenspace: &ClippedLayer,
) -> SurfaceResult<ClassUnions> {
    debug_assert_eq!(buildings.class(), SurfaceClass::Building);
    debug_assert_eq!(car_parks.class(), SurfaceClass::CarPark);
    debug_assert_eq!(greenspace.class(), SurfaceClass::Greenspace);

    let boundary_area = boundary.area();
    if !(boundary_area.is_finite() && boundary_area > 0.0) {
        return Err(SurfaceError::InvalidBoundary {
            stage: Stage::Classify,
            reason: format!("boundary area is {boundary_area}"),
        });
    }

    for layer in [buildings, car_parks, greenspace] {
        if layer.crs() != boundary.crs() {
            return Err(SurfaceError::Geometry {
                stage: Stage::Classify,
                context: format!("{} layer", layer.class()),
                reason: format!("layer CRS {} does not match boundary CRS {}", layer.crs(), boundary.crs()),
            });
        }
    }

    // 1. Buildings are never reduced.
    let building = buildings.union();

    // 2. Car park area under a building belongs to the building.
    let car_park = kernel::difference(&car_parks.union(), &building);

    // 3. Greenspace loses anything already occupied.
    let occupied = kernel::union(&building, &car_park);
    let greenspace = kernel::difference(&greenspace.union(), &occupied);

    // 4. Whatever is left of the boundary is opportunity.
    let classified = kernel::union(&occupied, &greenspace);
    let opportunity = kernel::difference(boundary.shape(), &classified);

    debug!(
        "[surface::classify] building={:.1} car_park={:.1} greenspace={:.1} opportunity={:.1} boundary={:.1}",
        kernel::area(&building), kernel::area(&car_park), kernel::area(&greenspace),
        kernel::area(&opportunity), boundary_area,
    );

    Ok(ClassUnions { building, car_park, greenspace, opportunity })
}
