#![doc = "Output-Area surface classification: buildings, car parks, greenspace and opportunity"]
mod catalog;
mod config;
mod error;
mod geom;
mod io;
mod lookup;
mod source;
mod surface;

#[doc(inline)]
pub use error::{LookupKind, Stage, SurfaceError, SurfaceResult};

#[doc(inline)]
pub use geom::{Crs, Geometries, PlanarStrategy, Reprojector, kernel};

#[doc(inline)]
pub use surface::{
    AreaReport, AreaRow, BoundaryPolygon, CandidateLayer, ClassUnions, ClippedLayer,
    DisplayGeometries, SurfaceAnalysis, SurfaceClass, SurfacePipeline, Tolerance,
    classify, clip, format_thousands, report, to_display_crs,
};

#[doc(inline)]
pub use lookup::{BoundaryIndex, PostcodeIndex, normalize_postcode};

#[doc(inline)]
pub use source::{CachedSource, DiskSource, LayerSource, MemSource, fetch_verified, sha256_hex};

#[cfg(feature = "download")]
#[doc(inline)]
pub use source::HttpSource;

#[doc(inline)]
pub use config::{Config, DEFAULT_BASE_URL, SourceSpec};

#[doc(inline)]
pub use catalog::{CandidateLayers, DataCatalog, PostcodeAnalysis};

#[doc(inline)]
pub use io::geojson::{Feature, FeatureCollection, read_geojson_bytes};
