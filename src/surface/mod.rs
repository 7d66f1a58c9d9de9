//! Priority-based surface classification of one boundary.

mod class;
mod classify;
mod clip;
mod display;
mod layer;
mod pipeline;
mod report;
mod tolerance;

pub use class::SurfaceClass;
pub use classify::{ClassUnions, classify};
pub use clip::clip;
pub use display::{DisplayGeometries, to_display_crs};
pub use layer::{BoundaryPolygon, CandidateLayer, ClippedLayer};
pub use pipeline::{SurfaceAnalysis, SurfacePipeline};
pub use report::{AreaReport, AreaRow, format_thousands, report};
pub use tolerance::Tolerance;
