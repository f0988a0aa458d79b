//! In-memory key-value storage
//!
//! Used by the `memory` session provider and by tests. Thread-safe via
//! `Arc<Mutex<>>`; clones share the same entries so a test can keep a handle
//! while the session manager owns another.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::SessionError;
use crate::store::KeyValueStore;

/// In-memory storage with switches to simulate an unavailable device store
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    rejected_keys: Arc<Mutex<HashSet<String>>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail as if the storage were unavailable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make writes to `key` fail while other keys keep working
    pub fn reject_writes_to(&self, key: &str) {
        self.rejected_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string());
    }

    /// Copy of all stored entries
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn check_available(&self) -> Result<(), SessionError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SessionError::Storage("storage unavailable".to_string()));
        }
        Ok(())
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, SessionError> {
        self.entries
            .lock()
            .map_err(|e| SessionError::Storage(format!("entries lock poisoned: {e}")))
    }
}

#[async_trait::async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        self.check_available()?;
        Ok(self.entries()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.check_available()?;
        let rejected = self
            .rejected_keys
            .lock()
            .map_err(|e| SessionError::Storage(format!("rejected keys lock poisoned: {e}")))?
            .contains(key);
        if rejected {
            return Err(SessionError::Storage(format!("write to {key} rejected")));
        }
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SessionError> {
        self.check_available()?;
        self.entries()?.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.check_available()?;
        self.entries()?.clear();
        Ok(())
    }
}
