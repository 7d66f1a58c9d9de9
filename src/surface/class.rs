use std::fmt;

use serde::{Deserialize, Serialize};

/// Mutually-exclusive land surface classes, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceClass {
    /// Never reduced by other classes.
    Building,
    /// Loses overlap to buildings.
    CarPark,
    /// Loses overlap to buildings and car parks.
    Greenspace,
    /// Residual boundary area, likely paved.
    Opportunity,
}

impl SurfaceClass {
    /// All classes, highest priority first.
    pub const ALL: [SurfaceClass; 4] = [
        SurfaceClass::Building,
        SurfaceClass::CarPark,
        SurfaceClass::Greenspace,
        SurfaceClass::Opportunity,
    ];

    /// Position in `ALL`; lower wins overlaps.
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            SurfaceClass::Building => 0,
            SurfaceClass::CarPark => 1,
            SurfaceClass::Greenspace => 2,
            SurfaceClass::Opportunity => 3,
        }
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            SurfaceClass::Building => "building",
            SurfaceClass::CarPark => "car_park",
            SurfaceClass::Greenspace => "greenspace",
            SurfaceClass::Opportunity => "opportunity",
        }
    }

    /// Human-readable label for tables and legends.
    pub fn label(&self) -> &'static str {
        match self {
            SurfaceClass::Building => "Buildings",
            SurfaceClass::CarPark => "Car Park",
            SurfaceClass::Greenspace => "Greenspace",
            SurfaceClass::Opportunity => "Opportunity (Likely Paved)",
        }
    }

    /// Map fill colour as RGBA.
    pub fn fill(&self) -> [u8; 4] {
        match self {
            SurfaceClass::Building => [200, 0, 0, 180],
            SurfaceClass::CarPark => [150, 0, 200, 180],
            SurfaceClass::Greenspace => [0, 180, 0, 180],
            SurfaceClass::Opportunity => [0, 100, 255, 160],
        }
    }
}

impl fmt::Display for SurfaceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}
