//! Shared configuration and error handling for the NagaMed client
//!
//! This crate provides common functionality used across the client crates:
//! - Configuration management loaded from the environment
//! - The error type every screen-level operation returns
//! - The user-facing messages those errors render as

pub mod config;
pub mod error;

pub use config::Config;
pub use error::{
    Error, ErrorKind, Result, MISSING_SESSION_MESSAGE, NETWORK_ERROR_MESSAGE,
    SESSION_STORAGE_MESSAGE,
};
