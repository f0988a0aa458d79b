//! Common error types and handling for the NagaMed client

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown for any transport-level failure
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Message shown when an authenticated action runs without a stored session
pub const MISSING_SESSION_MESSAGE: &str = "User ID or Token is missing.";

/// Message shown when the device could not persist or read the session
pub const SESSION_STORAGE_MESSAGE: &str = "Failed to retrieve authentication data.";

/// Common error type for the NagaMed client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Any non-success status or transport failure of a remote call.
    ///
    /// `status` is `None` when no response was received at all.
    #[error("Request failed: {detail}")]
    FetchFailed {
        status: Option<u16>,
        message: Option<String>,
        detail: String,
    },

    #[error("Token error: {0}")]
    Token(String),

    #[error("Session storage error: {0}")]
    Session(String),

    #[error("No stored session")]
    Unauthenticated,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Coarse classification used by callers to pick their feedback policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected before any network call
    Validation,
    /// No response from the remote API
    Transport,
    /// The remote API answered with a non-success status
    Server,
    /// Missing or unusable local session
    Session,
    /// Token could not be decoded or lacks a subject
    Token,
    Internal,
}

impl Error {
    /// Build a transport failure (no response received)
    pub fn transport(detail: impl Into<String>) -> Self {
        Error::FetchFailed {
            status: None,
            message: None,
            detail: detail.into(),
        }
    }

    /// Build a server-reported failure
    pub fn server(status: u16, message: Option<String>) -> Self {
        let detail = match &message {
            Some(message) => format!("server returned {status}: {message}"),
            None => format!("server returned {status}"),
        };
        Error::FetchFailed {
            status: Some(status),
            message,
            detail,
        }
    }

    /// Get the taxonomy bucket for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) => ErrorKind::Validation,
            Error::FetchFailed { status: None, .. } => ErrorKind::Transport,
            Error::FetchFailed { .. } => ErrorKind::Server,
            Error::Token(_) => ErrorKind::Token,
            Error::Session(_) | Error::Unauthenticated => ErrorKind::Session,
            Error::Unexpected(_) | Error::Serialization(_) | Error::Configuration(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// Text to show the user for this error.
    ///
    /// `fallback` is the operation-specific generic message used when the
    /// error carries nothing better (e.g. a server error without a payload).
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Validation(message) | Error::Token(message) => message.clone(),
            Error::FetchFailed { status: None, .. } => NETWORK_ERROR_MESSAGE.to_string(),
            Error::FetchFailed {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            Error::Unauthenticated => MISSING_SESSION_MESSAGE.to_string(),
            Error::Session(_) => SESSION_STORAGE_MESSAGE.to_string(),
            _ => fallback.to_string(),
        }
    }
}
