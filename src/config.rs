use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::geom::PlanarStrategy;
use crate::surface::Tolerance;

/// Public data repository the original London datasets are published in.
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/BoscoChoi/London-Surface-Area-Web-App-Homefolk-Hackathon-/main/data";

/// Where to find one data file, with an optional pinned checksum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    /// EPSG code of the file's coordinates, overriding what the file declares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsg: Option<u32>,
}

impl SourceSpec {
    pub fn new(location: impl Into<String>) -> Self {
        Self { location: location.into(), sha256: None, epsg: None }
    }
}

/// Run configuration: data locations, column names, CRS handling, tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix for relative locations fetched over HTTP.
    pub base_url: Option<String>,

    pub postcodes: SourceSpec,
    pub boundaries: SourceSpec,
    pub buildings: SourceSpec,
    pub car_parks: SourceSpec,
    pub greenspace: SourceSpec,

    /// Postcode column in the lookup CSV.
    pub postcode_column: String,
    /// Output-area column in the lookup CSV.
    pub area_column: String,
    /// Output-area id property on boundary features.
    pub boundary_id_property: String,

    /// EPSG code assumed for files that do not declare one.
    pub default_epsg: u32,

    pub planar: PlanarStrategy,
    pub tolerance: Tolerance,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            postcodes: SourceSpec::new("london_postcode_to_oa21_2025.csv"),
            boundaries: SourceSpec::new("oa_2021_london.geojson"),
            buildings: SourceSpec::new("osm_buildings.parquet"),
            car_parks: SourceSpec::new("osm_traffic.geojson"),
            greenspace: SourceSpec::new("OS_Greenspace_Ldn.geojson"),
            postcode_column: "pcds".to_string(),
            area_column: "oa21".to_string(),
            boundary_id_property: "OA21CD".to_string(),
            default_epsg: 4326,
            planar: PlanarStrategy::default(),
            tolerance: Tolerance::default(),
        }
    }
}

impl Config {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).context("[config] Failed to parse config JSON")
    }

    /// Read a JSON config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("[config] Failed to read config file: {}", path.display()))?;
        Self::from_json_bytes(&bytes)
            .with_context(|| format!("[config] Invalid config file: {}", path.display()))
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("[config] Failed to serialize config")
    }
}
