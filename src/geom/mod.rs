mod crs;
mod geom;
pub mod kernel;
mod proj;

pub use crs::{Crs, PlanarStrategy};
pub use geom::Geometries;
pub use proj::Reprojector;
