//! Session manager for the NagaMed client
//!
//! Owns the lifecycle of the device's credential record:
//! - `SessionStore` trait with `establish` / `read` / `clear` / `wipe`
//! - `SessionManager` persisting the record as two key-value entries
//! - File-backed storage for real devices, in-memory storage for tests
//! - Token decoding to recover the subject id at sign-in

mod claims;
mod config;
mod error;
mod file;
mod manager;
mod memory;
mod record;
mod store;
mod token;

pub use claims::TokenClaims;
pub use config::SessionConfig;
pub use error::{SessionError, TokenError};
pub use file::FileKeyValueStore;
pub use manager::{SessionManager, SessionStore, SessionStoreFactory, AUTH_TOKEN_KEY, USER_ID_KEY};
pub use memory::MemoryKeyValueStore;
pub use record::{CredentialRecord, SessionState};
pub use store::KeyValueStore;
pub use token::{decode_claims, subject_from_token};
