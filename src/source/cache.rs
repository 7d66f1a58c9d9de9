use std::{collections::HashMap, sync::{Arc, Mutex}};

use anyhow::{Result, anyhow};
use log::debug;

use crate::source::LayerSource;

/// Memoizes fetched bytes by location so repeated requests skip the inner source.
///
/// Entries live until `invalidate` or `clear` is called. Concurrent misses
/// for the same location may both fetch; the first stored copy wins.
pub struct CachedSource<S> {
    inner: S,
    entries: Mutex<HashMap<String, Arc<[u8]>>>,
}

impl<S: LayerSource> CachedSource<S> {
    pub fn new(inner: S) -> Self {
        Self { inner, entries: Mutex::new(HashMap::new()) }
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Arc<[u8]>>>> {
        self.entries.lock().map_err(|_| anyhow!("[source::cache] cache lock poisoned"))
    }

    /// Drop one cached location. Returns true if it was cached.
    pub fn invalidate(&self, location: &str) -> Result<bool> {
        Ok(self.entries()?.remove(location).is_some())
    }

    /// Drop every cached location.
    pub fn clear(&self) -> Result<()> {
        self.entries()?.clear();
        Ok(())
    }

    /// Number of cached locations.
    pub fn len(&self) -> Result<usize> {
        Ok(self.entries()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.entries()?.is_empty())
    }

    pub fn inner(&self) -> &S { &self.inner }
}

impl<S: LayerSource> LayerSource for CachedSource<S> {
    fn fetch(&self, location: &str) -> Result<Arc<[u8]>> {
        if let Some(bytes) = self.entries()?.get(location) {
            debug!("[source::cache] hit {location}");
            return Ok(bytes.clone());
        }

        // Fetch without holding the lock.
        debug!("[source::cache] miss {location}");
        let bytes = self.inner.fetch(location)?;
        Ok(self.entries()?.entry(location.to_string()).or_insert(bytes).clone())
    }
}
