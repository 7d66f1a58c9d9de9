use anyhow::Result;
use log::info;
use oasurface::{CachedSource, Config, DataCatalog, DiskSource, HttpSource, LayerSource, SurfacePipeline};

use crate::cli::{AnalyzeArgs, Cli};

pub fn run(_cli: &Cli, args: &AnalyzeArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let source: Box<dyn LayerSource> = match &args.data_dir {
        Some(dir) => {
            info!("[analyze] reading data from {}", dir.display());
            Box::new(DiskSource::new(dir))
        }
        None => Box::new(HttpSource::new(config.base_url.clone())?),
    };

    let pipeline = SurfacePipeline::new(config.planar, config.tolerance);
    let catalog = DataCatalog::new(config, CachedSource::new(source));

    let result = catalog.analyze_postcode(&args.postcode, &pipeline)?;
    if !args.output.json {
        println!("Postcode {} -> Output Area {}\n", result.postcode, result.output_area);
    }

    let header = serde_json::json!({
        "postcode": result.postcode,
        "output_area": &*result.output_area,
    });
    super::emit(&result.analysis, header, &args.output)
}
