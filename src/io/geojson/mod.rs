mod read;
mod write;

pub use read::{Feature, FeatureCollection, read_geojson_bytes};
pub use write::{feature, multipolygon_to_value, point_to_value, write_feature_collection};
