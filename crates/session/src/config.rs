//! Session storage configuration

use std::path::PathBuf;

use crate::error::SessionError;

/// Session storage configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Storage provider (file, memory)
    pub provider: String,
    /// Location of the session file for the `file` provider
    pub path: PathBuf,
}

impl SessionConfig {
    /// Create session config from environment variables
    pub fn from_env() -> Result<Self, SessionError> {
        let config = nagamed_common::Config::from_env()
            .map_err(|e| SessionError::Configuration(e.to_string()))?;
        Ok(Self::from(&config))
    }
}

impl From<&nagamed_common::Config> for SessionConfig {
    fn from(config: &nagamed_common::Config) -> Self {
        Self {
            provider: config.session_provider.clone(),
            path: config.session_path.clone(),
        }
    }
}
