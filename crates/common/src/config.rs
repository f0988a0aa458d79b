//! Configuration management
//!
//! All configuration is loaded from environment variables (and an optional
//! `.env` file) so the same binary can point at a staging API or keep its
//! session somewhere else without a rebuild.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://devapi-618v.onrender.com";
pub const DEFAULT_RUST_LOG: &str = "nagamed=info";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote API
    pub api_base_url: String,
    pub api_provider: String,

    /// Device-local session storage
    pub session_provider: String,
    pub session_path: PathBuf,

    /// Runtime configuration
    pub rust_log: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("NAGAMED_API_BASE_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        if !api_base_url.starts_with("http://") && !api_base_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "NAGAMED_API_BASE_URL must be an http(s) URL, got {api_base_url}"
            ));
        }

        let session_path = match lookup("NAGAMED_SESSION_PATH") {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            _ => default_session_path(lookup("HOME")),
        };

        let config = Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_provider: lookup("NAGAMED_API_PROVIDER").unwrap_or_else(|| "http".to_string()),
            session_provider: lookup("NAGAMED_SESSION_PROVIDER")
                .unwrap_or_else(|| "file".to_string()),
            session_path,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| DEFAULT_RUST_LOG.to_string()),
        };

        tracing::debug!(
            api_base_url = %config.api_base_url,
            api_provider = %config.api_provider,
            session_provider = %config.session_provider,
            "Configuration loaded"
        );

        Ok(config)
    }
}

fn default_session_path(home: Option<String>) -> PathBuf {
    let base = home
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join(".nagamed").join("session.json")
}
