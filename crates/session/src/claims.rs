//! Token claims types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payload of the token issued by `POST /api/auth/login`.
///
/// Only `id` is read by the client; everything else is kept for logging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject id, a number or a string depending on the backend version
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    /// Subject id rendered as the string stored under `userId`.
    ///
    /// Absent, `null`, empty, zero and non-scalar ids all count as missing.
    pub fn subject(&self) -> Option<String> {
        match self.id.as_ref()? {
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}
