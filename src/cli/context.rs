//! Per-invocation state shared by the networked commands

use miette::Result;

use crate::core::{Config, HttpItemsApi};

pub struct AppContext {
    pub config: Config,
    pub api: HttpItemsApi,
}

impl AppContext {
    /// Build the HTTP client for an already resolved configuration
    pub fn new(config: Config) -> Result<Self> {
        if let Some(path) = &config.source {
            tracing::debug!(path = %path.display(), "loaded config file");
        }
        tracing::debug!(api_url = %config.api_url, "using API");

        let api = HttpItemsApi::new(config.api_url.clone())?;
        Ok(Self { config, api })
    }
}
