//! Format-specific readers and writers.
//!
//! - `csv` - postcode lookup tables
//! - `geojson` - boundaries, layers and display output
//! - `geoparquet` - large layers (requires `parquet` feature)

pub(crate) mod csv;
pub(crate) mod geojson;

#[cfg(feature = "parquet")]
pub(crate) mod geoparquet;
