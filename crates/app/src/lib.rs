//! NagaMed application composition root
//!
//! Wires the session store and the remote API together and exposes the
//! flows every screen runs: sign-up, sign-in, identity loading, profile
//! management, logout and account deletion.

pub mod appointments;
pub mod auth;
pub mod authenticated;
pub mod deletion;
pub mod home;
pub mod identity;
pub mod navigation;
pub mod profile;

use std::sync::Arc;

use nagamed_api::{ApiConfig, ApiService, ApiServiceFactory};
use nagamed_common::Config;
use nagamed_session::{SessionConfig, SessionStore, SessionStoreFactory};

pub use navigation::Route;

/// Shared dependencies of every screen
#[derive(Clone)]
pub struct App {
    session: Arc<dyn SessionStore>,
    api: Arc<dyn ApiService>,
}

impl App {
    pub fn new(session: Arc<dyn SessionStore>, api: Arc<dyn ApiService>) -> Self {
        Self { session, api }
    }

    /// Build the application from configuration
    pub fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        let session = SessionStoreFactory::create(SessionConfig::from(config))?;
        let api = ApiServiceFactory::create(ApiConfig::from(config))?;

        Ok(Self {
            session: Arc::from(session),
            api: Arc::from(api),
        })
    }

    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    pub fn api(&self) -> &dyn ApiService {
        self.api.as_ref()
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App").finish_non_exhaustive()
    }
}
