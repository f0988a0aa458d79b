//! Credential record and session state

/// The persisted (userId, authToken) pair of an authenticated device
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub user_id: String,
    pub auth_token: String,
}

impl CredentialRecord {
    pub fn new(user_id: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            auth_token: auth_token.into(),
        }
    }

    /// Value sent as the `Authorization` header: the stored token, trimmed,
    /// with no scheme prefix added.
    pub fn authorization(&self) -> &str {
        self.auth_token.trim()
    }
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("user_id", &self.user_id)
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}

/// Whether this device is signed in, and as whom
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated(CredentialRecord),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn user_id(&self) -> Option<&str> {
        match self {
            Self::Authenticated(record) => Some(&record.user_id),
            Self::Unauthenticated => None,
        }
    }
}

impl From<Option<CredentialRecord>> for SessionState {
    fn from(record: Option<CredentialRecord>) -> Self {
        match record {
            Some(record) => Self::Authenticated(record),
            None => Self::Unauthenticated,
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Authenticated(_) => write!(f, "authenticated"),
        }
    }
}
