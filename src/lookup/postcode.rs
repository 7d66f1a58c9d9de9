use std::sync::Arc;

use ahash::AHashMap;
use anyhow::{Result, ensure};
use polars::prelude::DataType;

use crate::error::{LookupKind, SurfaceError, SurfaceResult};
use crate::io::csv::read_csv_bytes;

/// Canonical postcode key: upper-case with all whitespace removed.
pub fn normalize_postcode(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Exact-match index from normalized postcode to output-area code.
#[derive(Debug, Clone, Default)]
pub struct PostcodeIndex {
    index: AHashMap<String, Arc<str>>,
}

impl PostcodeIndex {
    /// Build from `(postcode, area)` pairs. The first row wins for duplicate postcodes.
    pub fn from_pairs<P: AsRef<str>, A: AsRef<str>>(pairs: impl IntoIterator<Item = (P, A)>) -> Self {
        let mut index = AHashMap::new();
        for (postcode, area) in pairs {
            index.entry(normalize_postcode(postcode.as_ref()))
                .or_insert_with(|| Arc::from(area.as_ref().trim()));
        }
        Self { index }
    }

    /// Read a lookup CSV with a header row naming `postcode_col` and `area_col`.
    pub fn from_csv_bytes(bytes: &[u8], postcode_col: &str, area_col: &str) -> Result<Self> {
        let df = read_csv_bytes(bytes)?;
        let names = df.get_column_names();
        ensure!(names.iter().any(|n| n.as_str() == postcode_col),
            "[lookup::postcode] CSV has no '{postcode_col}' column");
        ensure!(names.iter().any(|n| n.as_str() == area_col),
            "[lookup::postcode] CSV has no '{area_col}' column");

        let postcodes = df.column(postcode_col)?.cast(&DataType::String)?;
        let areas = df.column(area_col)?.cast(&DataType::String)?;

        let pairs = postcodes.str()?.into_iter()
            .zip(areas.str()?.into_iter())
            .filter_map(|(postcode, area)| Some((postcode?, area?)));

        let index = Self::from_pairs(pairs);
        log::debug!("[lookup::postcode] indexed {} postcodes from {} rows", index.len(), df.height());
        Ok(index)
    }

    #[inline] pub fn len(&self) -> usize { self.index.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.index.is_empty() }

    /// Resolve a postcode as typed by a user. No fuzzy matching is attempted.
    pub fn resolve(&self, postcode: &str) -> SurfaceResult<Arc<str>> {
        let key = normalize_postcode(postcode);
        self.index.get(&key).cloned()
            .ok_or(SurfaceError::LookupMiss { kind: LookupKind::Postcode, key })
    }
}
