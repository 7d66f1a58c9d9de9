pub mod analyze;
pub mod classify;

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use oasurface::SurfaceAnalysis;

use crate::cli::OutputArgs;

/// Print the report and write display GeoJSON if requested.
pub fn emit(analysis: &SurfaceAnalysis, header: serde_json::Value, output: &OutputArgs) -> Result<()> {
    if output.json {
        let mut value = header;
        value["planar_crs"] = analysis.planar_crs.to_string().into();
        value["report"] = serde_json::to_value(&analysis.report)
            .context("[output] Failed to serialize report")?;
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", analysis.report);
    }

    if let Some(path) = &output.geojson {
        write_geojson(analysis, path)?;
    }
    Ok(())
}

fn write_geojson(analysis: &SurfaceAnalysis, path: &Path) -> Result<()> {
    let bytes = analysis.display.to_geojson()?;
    std::fs::write(path, bytes)
        .with_context(|| format!("[output] Failed to write GeoJSON to {}", path.display()))?;
    info!("[output] wrote display GeoJSON to {}", path.display());
    Ok(())
}
