use std::path::Path;

use anyhow::{Context, Result};
use oasurface::{BoundaryPolygon, CandidateLayer, Crs, SurfaceClass, SurfacePipeline, kernel, read_geojson_bytes};

use crate::cli::{ClassifyArgs, Cli};

/// Read a GeoJSON file's shapes and its CRS (declared, else `fallback`).
fn read_layer(path: &Path, fallback: u32) -> Result<(Vec<geo::MultiPolygon<f64>>, Crs)> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("[classify] Failed to read {}", path.display()))?;
    let collection = read_geojson_bytes(&bytes)
        .with_context(|| format!("[classify] Failed to parse {}", path.display()))?;
    let crs = Crs::from_epsg(collection.epsg.unwrap_or(fallback))?;
    Ok((collection.features.into_iter().map(|f| f.shape).collect(), crs))
}

pub fn run(_cli: &Cli, args: &ClassifyArgs) -> Result<()> {
    let fallback = args.crs.unwrap_or(4326);

    let (shapes, crs) = read_layer(&args.boundary, fallback)?;
    let boundary = BoundaryPolygon::new(kernel::union_all(&shapes), crs)
        .with_context(|| format!("[classify] Invalid boundary in {}", args.boundary.display()))?;

    let layer = |class: SurfaceClass, path: &Path| -> Result<CandidateLayer> {
        let (shapes, crs) = read_layer(path, fallback)?;
        Ok(match class {
            SurfaceClass::Building => CandidateLayer::buildings(shapes, crs),
            SurfaceClass::CarPark => CandidateLayer::car_parks(shapes, crs),
            _ => CandidateLayer::greenspace(shapes, crs),
        })
    };
    let buildings = layer(SurfaceClass::Building, &args.buildings)?;
    let car_parks = layer(SurfaceClass::CarPark, &args.carparks)?;
    let greenspace = layer(SurfaceClass::Greenspace, &args.greenspace)?;

    let analysis = SurfacePipeline::default().run(&boundary, &buildings, &car_parks, &greenspace)?;
    super::emit(&analysis, serde_json::json!({}), &args.output)
}
