use anyhow::{bail, Result};
use serde::Deserialize;
use std::net::SocketAddr;

use crate::tmdb::TMDB_BASE;

/// Settings read from the environment (`.env` honoured).
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub tmdb_api_key: String,

    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL of a running proxy server, tried first for movie details.
    #[serde(default)]
    pub proxy_url: Option<String>,
}

fn default_tmdb_api_url() -> String {
    TMDB_BASE.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3146
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I: IntoIterator<Item = (String, String)>>(vars: I) -> Result<Self> {
        let config: Config = envy::from_iter(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        if config.tmdb_api_key.trim().is_empty() {
            bail!("Missing required environment variable: TMDB_API_KEY");
        }
        Ok(config)
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address {}: {}", addr, e))
    }
}
