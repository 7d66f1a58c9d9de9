use std::{io::Read, sync::Arc};

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};

use crate::config::SourceSpec;
use crate::source::LayerSource;

/// Gzip magic bytes.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Lower-case hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Fetch `spec.location`, check its pinned SHA-256 (over the raw bytes) when
/// one is configured, and transparently gunzip gzip payloads.
pub fn fetch_verified(source: &dyn LayerSource, spec: &SourceSpec) -> Result<Arc<[u8]>> {
    let bytes = source.fetch(&spec.location)?;

    if let Some(expected) = &spec.sha256 {
        let actual = sha256_hex(&bytes);
        if !actual.eq_ignore_ascii_case(expected.trim()) {
            bail!("[source::verify] checksum mismatch for {}: expected {expected}, got {actual}", spec.location);
        }
    }

    if bytes.starts_with(&GZIP_MAGIC) {
        let mut out = Vec::new();
        GzDecoder::new(bytes.as_ref()).read_to_end(&mut out)
            .with_context(|| format!("[source::verify] Failed to decompress {}", spec.location))?;
        return Ok(Arc::from(out));
    }

    Ok(bytes)
}
