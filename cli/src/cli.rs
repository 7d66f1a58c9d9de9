use std::path::PathBuf;

/// Output-Area surface classification CLI
#[derive(clap::Parser, Debug)]
#[command(name = "oasurface", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Classify the output area containing a postcode
    Analyze(AnalyzeArgs),

    /// Classify a boundary from local GeoJSON files
    Classify(ClassifyArgs),
}

/// Flags shared by both subcommands.
#[derive(clap::Args, Debug)]
pub struct OutputArgs {
    /// Write display GeoJSON (WGS84) to this file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub geojson: Option<PathBuf>,

    /// Print the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug)]
pub struct AnalyzeArgs {
    /// UK postcode, e.g. "E1 6AN"
    pub postcode: String,

    /// JSON config file, defaults to built-in London data locations
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Read data files from this directory instead of downloading them
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(clap::Args, Debug)]
pub struct ClassifyArgs {
    /// Boundary GeoJSON; all features are merged into one boundary
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub boundary: PathBuf,

    /// Building footprints GeoJSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub buildings: PathBuf,

    /// Car park GeoJSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub carparks: PathBuf,

    /// Greenspace GeoJSON
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub greenspace: PathBuf,

    /// EPSG code for files that do not declare a CRS, defaults to 4326
    #[arg(long)]
    pub crs: Option<u32>,

    #[command(flatten)]
    pub output: OutputArgs,
}
