use std::sync::Arc;

use anyhow::{Context, Result};
use geo::MultiPolygon;
use log::info;

use crate::config::{Config, SourceSpec};
use crate::geom::Crs;
use crate::io::geojson::{FeatureCollection, read_geojson_bytes};
use crate::lookup::{BoundaryIndex, PostcodeIndex, normalize_postcode};
use crate::source::{LayerSource, fetch_verified};
use crate::surface::{CandidateLayer, SurfaceAnalysis, SurfaceClass, SurfacePipeline};

/// The three raw candidate layers.
#[derive(Debug, Clone)]
pub struct CandidateLayers {
    pub buildings: CandidateLayer,
    pub car_parks: CandidateLayer,
    pub greenspace: CandidateLayer,
}

/// Result of analysing the output area containing a postcode.
#[derive(Debug, Clone)]
pub struct PostcodeAnalysis {
    /// Normalized postcode.
    pub postcode: String,
    pub output_area: Arc<str>,
    pub analysis: SurfaceAnalysis,
}

/// Data files named by a `Config`, read through a `LayerSource`.
///
/// All fetching and parsing happens here, before the pipeline runs. Wrap the
/// source in a `CachedSource` to avoid refetching between requests.
pub struct DataCatalog<S> {
    config: Config,
    source: S,
}

impl<S: LayerSource> DataCatalog<S> {
    pub fn new(config: Config, source: S) -> Self {
        Self { config, source }
    }

    #[inline] pub fn config(&self) -> &Config { &self.config }

    #[inline] pub fn source(&self) -> &S { &self.source }

    fn fetch(&self, spec: &SourceSpec) -> Result<Arc<[u8]>> {
        fetch_verified(&self.source, spec)
            .with_context(|| format!("[catalog] Failed to fetch {}", spec.location))
    }

    /// CRS for a file: explicit override, then what the file declares, then the default.
    fn crs_for(&self, spec: &SourceSpec, declared: Option<u32>) -> Result<Crs> {
        let code = spec.epsg.or(declared).unwrap_or(self.config.default_epsg);
        Crs::from_epsg(code).with_context(|| format!("[catalog] {}", spec.location))
    }

    /// Load the postcode → output-area lookup table.
    pub fn postcode_index(&self) -> Result<PostcodeIndex> {
        let spec = &self.config.postcodes;
        let bytes = self.fetch(spec)?;
        PostcodeIndex::from_csv_bytes(&bytes, &self.config.postcode_column, &self.config.area_column)
            .with_context(|| format!("[catalog] Failed to read postcode lookup {}", spec.location))
    }

    /// Load the output-area boundaries.
    pub fn boundary_index(&self) -> Result<BoundaryIndex> {
        let spec = &self.config.boundaries;
        let bytes = self.fetch(spec)?;
        let collection = read_geojson_bytes(&bytes)
            .with_context(|| format!("[catalog] Failed to read boundaries {}", spec.location))?;
        let crs = self.crs_for(spec, collection.epsg)?;
        Ok(BoundaryIndex::from_features(collection.features, &self.config.boundary_id_property, crs))
    }

    /// Load one candidate layer.
    pub fn load_layer(&self, class: SurfaceClass) -> Result<CandidateLayer> {
        let spec = match class {
            SurfaceClass::Building => &self.config.buildings,
            SurfaceClass::CarPark => &self.config.car_parks,
            SurfaceClass::Greenspace => &self.config.greenspace,
            SurfaceClass::Opportunity => anyhow::bail!("[catalog] opportunity is derived, not loaded"),
        };

        let bytes = self.fetch(spec)?;
        let (shapes, declared) = read_shapes(spec, &bytes)
            .with_context(|| format!("[catalog] Failed to read {class} layer {}", spec.location))?;
        let crs = self.crs_for(spec, declared)?;
        info!("[catalog] {class}: {} shapes from {} ({crs})", shapes.len(), spec.location);

        Ok(match class {
            SurfaceClass::Building => CandidateLayer::buildings(shapes, crs),
            SurfaceClass::CarPark => CandidateLayer::car_parks(shapes, crs),
            _ => CandidateLayer::greenspace(shapes, crs),
        })
    }

    /// Load all three candidate layers.
    pub fn load_layers(&self) -> Result<CandidateLayers> {
        Ok(CandidateLayers {
            buildings: self.load_layer(SurfaceClass::Building)?,
            car_parks: self.load_layer(SurfaceClass::CarPark)?,
            greenspace: self.load_layer(SurfaceClass::Greenspace)?,
        })
    }

    /// Resolve a postcode to its output area and classify that area.
    ///
    /// Lookups run first, so an unknown postcode fails before any layer is fetched.
    pub fn analyze_postcode(&self, postcode: &str, pipeline: &SurfacePipeline) -> Result<PostcodeAnalysis> {
        let output_area = self.postcode_index()?.resolve(postcode)?;
        info!("[catalog] postcode {} -> output area {output_area}", normalize_postcode(postcode));

        let boundary = self.boundary_index()?.boundary(&output_area)?;
        let layers = self.load_layers()?;

        let analysis = pipeline.run(&boundary, &layers.buildings, &layers.car_parks, &layers.greenspace)?;
        Ok(PostcodeAnalysis { postcode: normalize_postcode(postcode), output_area, analysis })
    }
}

/// Parse layer bytes by file type: GeoParquet for `.parquet`, GeoJSON otherwise.
fn read_shapes(spec: &SourceSpec, bytes: &[u8]) -> Result<(Vec<MultiPolygon<f64>>, Option<u32>)> {
    let location = spec.location.trim_end_matches(".gz");
    if location.ends_with(".parquet") {
        read_parquet_shapes(bytes).map(|shapes| (shapes, None))
    } else {
        let FeatureCollection { features, epsg } = read_geojson_bytes(bytes)?;
        Ok((features.into_iter().map(|f| f.shape).collect(), epsg))
    }
}

#[cfg(feature = "parquet")]
fn read_parquet_shapes(bytes: &[u8]) -> Result<Vec<MultiPolygon<f64>>> {
    crate::io::geoparquet::read_geoparquet_bytes(bytes)
}

#[cfg(not(feature = "parquet"))]
fn read_parquet_shapes(_bytes: &[u8]) -> Result<Vec<MultiPolygon<f64>>> {
    anyhow::bail!("[catalog] GeoParquet support requires the `parquet` feature")
}
