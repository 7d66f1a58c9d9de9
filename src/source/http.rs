use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use log::info;
use reqwest::{blocking::Client, redirect::Policy};

use crate::source::LayerSource;

/// Blocking HTTP source. Relative locations are joined onto `base_url`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Option<String>,
}

impl HttpSource {
    pub fn new(base_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("oasurface/", env!("CARGO_PKG_VERSION")))
            .redirect(Policy::limited(10))
            .timeout(Duration::from_secs(300))
            .build()
            .context("[source::http] Failed to build HTTP client")?;
        Ok(Self { client, base_url })
    }

    fn url(&self, location: &str) -> String {
        match &self.base_url {
            Some(base) if !location.contains("://") => {
                format!("{}/{}", base.trim_end_matches('/'), location.trim_start_matches('/'))
            }
            _ => location.to_string(),
        }
    }
}

impl LayerSource for HttpSource {
    fn fetch(&self, location: &str) -> Result<Arc<[u8]>> {
        let url = self.url(location);
        info!("[source::http] GET {url}");

        let bytes = self.client.get(&url).send()
            .with_context(|| format!("[source::http] GET {url}"))?
            .error_for_status()
            .with_context(|| format!("[source::http] GET {url} returned error status"))?
            .bytes()
            .with_context(|| format!("[source::http] Failed to read body of {url}"))?;

        Ok(Arc::from(bytes.as_ref()))
    }
}
