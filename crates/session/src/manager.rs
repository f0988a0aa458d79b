//! Session manager
//!
//! Single source of truth for "is this device authenticated, and as whom".
//! The credential record is stored as two independent entries, `userId` and
//! `authToken`; a record is only reported when both are present.

use std::sync::Arc;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::file::FileKeyValueStore;
use crate::memory::MemoryKeyValueStore;
use crate::record::{CredentialRecord, SessionState};
use crate::store::KeyValueStore;

pub const USER_ID_KEY: &str = "userId";
pub const AUTH_TOKEN_KEY: &str = "authToken";

/// Session store trait for different storage backends
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a credential record, replacing any previous one.
    ///
    /// On failure no half-written record is left readable.
    async fn establish(&self, user_id: &str, auth_token: &str) -> Result<(), SessionError>;

    /// The stored record, or `None` when either entry is missing or empty
    async fn read(&self) -> Result<Option<CredentialRecord>, SessionError>;

    /// Remove the credential record (logout). Idempotent.
    async fn clear(&self) -> Result<(), SessionError>;

    /// Remove everything this application persisted (account deletion). Idempotent.
    async fn wipe(&self) -> Result<(), SessionError>;

    async fn state(&self) -> Result<SessionState, SessionError> {
        Ok(SessionState::from(self.read().await?))
    }
}

/// Session manager over any key-value storage
#[derive(Clone)]
pub struct SessionManager {
    storage: Arc<dyn KeyValueStore>,
}

impl SessionManager {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    /// Session manager backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryKeyValueStore::new()))
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl SessionStore for SessionManager {
    async fn establish(&self, user_id: &str, auth_token: &str) -> Result<(), SessionError> {
        // Drop the previous token first so an interrupted overwrite never
        // pairs the new userId with the old token
        self.storage.remove(AUTH_TOKEN_KEY).await?;
        self.storage.set(USER_ID_KEY, user_id).await?;

        if let Err(e) = self.storage.set(AUTH_TOKEN_KEY, auth_token).await {
            // A lone userId would read as a partial record
            if let Err(rollback) = self.storage.remove(USER_ID_KEY).await {
                tracing::warn!(error = %rollback, "Failed to roll back userId after token write failed");
            }
            tracing::warn!(error = %e, "Failed to persist session");
            return Err(e);
        }

        tracing::info!(user_id = %user_id, "Session established");
        Ok(())
    }

    async fn read(&self) -> Result<Option<CredentialRecord>, SessionError> {
        let user_id = self.storage.get(USER_ID_KEY).await?;
        let auth_token = self.storage.get(AUTH_TOKEN_KEY).await?;

        match (user_id, auth_token) {
            (Some(user_id), Some(auth_token))
                if !user_id.trim().is_empty() && !auth_token.trim().is_empty() =>
            {
                Ok(Some(CredentialRecord::new(user_id, auth_token)))
            }
            (None, None) => Ok(None),
            (user_id, auth_token) => {
                tracing::debug!(
                    has_user_id = user_id.is_some(),
                    has_auth_token = auth_token.is_some(),
                    "Partial session treated as guest"
                );
                Ok(None)
            }
        }
    }

    async fn clear(&self) -> Result<(), SessionError> {
        let token_result = self.storage.remove(AUTH_TOKEN_KEY).await;
        let user_result = self.storage.remove(USER_ID_KEY).await;
        token_result?;
        user_result?;

        tracing::info!("Session cleared");
        Ok(())
    }

    async fn wipe(&self) -> Result<(), SessionError> {
        self.storage.clear().await?;
        tracing::info!("Local application data wiped");
        Ok(())
    }
}

/// Factory for creating SessionStore implementations
pub struct SessionStoreFactory;

impl SessionStoreFactory {
    /// Create a SessionStore based on configuration
    pub fn create(config: SessionConfig) -> Result<Box<dyn SessionStore>, SessionError> {
        match config.provider.as_str() {
            "file" => {
                tracing::info!(path = %config.path.display(), "Creating file-backed session store");
                Ok(Box::new(SessionManager::new(Arc::new(
                    FileKeyValueStore::new(config.path),
                ))))
            }
            "memory" => {
                tracing::info!("Creating in-memory session store");
                Ok(Box::new(SessionManager::in_memory()))
            }
            provider => Err(SessionError::Configuration(format!(
                "Unknown session provider: {}. Supported providers: file, memory",
                provider
            ))),
        }
    }
}
