//! Authenticated request helper
//!
//! Every screen that talks to the user resource goes through [`authenticated`]:
//! read the stored session, run the call with the stored token attached, and
//! fold any failure into `Error::FetchFailed`.

use std::future::Future;

use nagamed_api::ApiError;
use nagamed_common::{Error, Result};
use nagamed_session::{CredentialRecord, SessionStore};

/// Result of an authenticated call
#[derive(Debug, Clone, PartialEq)]
pub enum Authenticated<T> {
    /// No usable session; the call was not attempted
    Guest,
    Fetched(T),
}

impl<T> Authenticated<T> {
    pub fn is_guest(&self) -> bool {
        matches!(self, Self::Guest)
    }

    /// Treat a guest as an error for actions that cannot run without a session
    pub fn require(self) -> Result<T> {
        match self {
            Self::Guest => Err(Error::Unauthenticated),
            Self::Fetched(value) => Ok(value),
        }
    }
}

/// Run `call` with the stored credential record.
///
/// Unreadable storage is logged and treated as a guest session. The call
/// receives the record; its `authorization()` is the exact header value.
pub async fn authenticated<T, F, Fut>(
    session: &dyn SessionStore,
    operation: &'static str,
    call: F,
) -> Result<Authenticated<T>>
where
    F: FnOnce(CredentialRecord) -> Fut,
    Fut: Future<Output = std::result::Result<T, ApiError>>,
{
    let record = match session.read().await {
        Ok(Some(record)) => record,
        Ok(None) => {
            tracing::debug!(operation, "No stored session, continuing as guest");
            return Ok(Authenticated::Guest);
        }
        Err(e) => {
            tracing::warn!(operation, error = %e, "Failed to read session, continuing as guest");
            return Ok(Authenticated::Guest);
        }
    };

    let user_id = record.user_id.clone();
    match call(record).await {
        Ok(value) => Ok(Authenticated::Fetched(value)),
        Err(e) => {
            let err = Error::from(e);
            tracing::warn!(operation, user_id = %user_id, error = %err, "Authenticated request failed");
            Err(err)
        }
    }
}
