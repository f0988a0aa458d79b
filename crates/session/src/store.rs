//! Device-local key-value storage

use crate::error::SessionError;

/// Durable string key-value storage owned by this device.
///
/// Implementations must treat removing a missing key, or clearing an empty
/// store, as success.
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;

    async fn remove(&self, key: &str) -> Result<(), SessionError>;

    /// Remove every entry this application persisted
    async fn clear(&self) -> Result<(), SessionError>;
}
