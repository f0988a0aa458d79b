//! Session and token errors

use thiserror::Error;

/// Failure of the device-local session storage
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session configuration error: {0}")]
    Configuration(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure to recover a subject id from an authentication token
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("Missing token in response")]
    MissingToken,

    #[error("Invalid token specified: {0}")]
    Malformed(String),

    #[error("Missing `id` in token")]
    MissingSubject,
}

impl From<SessionError> for nagamed_common::Error {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Configuration(message) => nagamed_common::Error::Configuration(message),
            other => nagamed_common::Error::Session(other.to_string()),
        }
    }
}

impl From<TokenError> for nagamed_common::Error {
    fn from(err: TokenError) -> Self {
        nagamed_common::Error::Token(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nagamed_common::ErrorKind;

    #[test]
    fn test_token_error_display() {
        assert_eq!(TokenError::MissingToken.to_string(), "Missing token in response");
        assert_eq!(TokenError::MissingSubject.to_string(), "Missing `id` in token");
        assert_eq!(
            TokenError::Malformed("bad base64".to_string()).to_string(),
            "Invalid token specified: bad base64"
        );
    }

    #[test]
    fn test_conversions_into_common_error() {
        let err: nagamed_common::Error = TokenError::MissingSubject.into();
        assert_eq!(err.kind(), ErrorKind::Token);
        assert_eq!(err.user_message("unused"), "Missing `id` in token");

        let err: nagamed_common::Error = SessionError::Storage("disk full".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Session);

        let err: nagamed_common::Error =
            SessionError::Configuration("unknown provider".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
