//! Byte sources for lookup tables and layers.
//!
//! Fetching happens before the classification pipeline starts; the core only
//! ever sees in-memory geometries.

mod cache;
#[cfg(feature = "download")]
mod http;
mod verify;

use std::{collections::HashMap, path::PathBuf, sync::Arc};

use anyhow::{Context, Result, anyhow};

pub use cache::CachedSource;
#[cfg(feature = "download")]
pub use http::HttpSource;
pub use verify::{fetch_verified, sha256_hex};

/// Read-only access to data files by location, e.g.
/// "oa_2021_london.geojson" or a full URL.
pub trait LayerSource: Send + Sync {
    fn fetch(&self, location: &str) -> Result<Arc<[u8]>>;
}

impl<S: LayerSource + ?Sized> LayerSource for Arc<S> {
    fn fetch(&self, location: &str) -> Result<Arc<[u8]>> { (**self).fetch(location) }
}

impl<S: LayerSource + ?Sized> LayerSource for Box<S> {
    fn fetch(&self, location: &str) -> Result<Arc<[u8]>> { (**self).fetch(location) }
}

/// Simple disk-based source. Relative locations resolve against `root`.
#[derive(Debug, Clone)]
pub struct DiskSource {
    root: PathBuf,
}

impl DiskSource {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    fn full(&self, location: &str) -> PathBuf { self.root.join(location) }
}

impl LayerSource for DiskSource {
    fn fetch(&self, location: &str) -> Result<Arc<[u8]>> {
        let path = self.full(location);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("[source::disk] Failed to read {}", path.display()))?;
        Ok(Arc::from(bytes))
    }
}

/// Simple in-memory source.
#[derive(Debug, Default, Clone)]
pub struct MemSource {
    files: HashMap<String, Arc<[u8]>>,
}

impl MemSource {
    pub fn new() -> Self { Self::default() }

    /// Add or replace a file.
    pub fn insert(&mut self, location: impl Into<String>, bytes: impl Into<Arc<[u8]>>) {
        self.files.insert(location.into(), bytes.into());
    }
}

impl LayerSource for MemSource {
    fn fetch(&self, location: &str) -> Result<Arc<[u8]>> {
        self.files.get(location).cloned()
            .ok_or_else(|| anyhow!("[source::mem] missing file: {location}"))
    }
}
