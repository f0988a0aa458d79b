//! Request and response bodies of the remote API

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Account type assigned at sign-up
pub const PATIENT_TYPE_ID: i64 = 1;

/// Account type sent on profile update when the profile's own is unknown
pub const FALLBACK_TYPE_ID: i64 = 4;

/// Body of `POST /api/auth/register`
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterRequest {
    pub fullname: String,
    pub username: String,
    pub password: String,
    pub type_id: i64,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("fullname", &self.fullname)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("type_id", &self.type_id)
            .finish()
    }
}

/// Body of `POST /api/auth/login`
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Successful login response. `token` is optional on the wire; its absence
/// is a sign-in failure decided by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Account type id, sent as a number but sometimes returned as a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountTypeId {
    Number(i64),
    Text(String),
}

impl AccountTypeId {
    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Response of `GET /api/user/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub type_id: Option<AccountTypeId>,
}

impl UserProfile {
    /// Numeric account type to send back on update
    pub fn type_id_or_fallback(&self) -> i64 {
        self.type_id
            .as_ref()
            .and_then(AccountTypeId::as_number)
            .unwrap_or(FALLBACK_TYPE_ID)
    }
}

/// Body of `PUT /api/user/{id}`
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateUserRequest {
    pub fullname: String,
    pub username: String,
    pub type_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for UpdateUserRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateUserRequest")
            .field("fullname", &self.fullname)
            .field("username", &self.username)
            .field("type_id", &self.type_id)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Pull a human-readable message out of an error payload.
///
/// The auth endpoints answer `{ message }`, the user endpoints `{ error }`.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|field| value.get(field).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_request_omits_absent_password() {
        let request = UpdateUserRequest {
            fullname: "Alice Reyes".to_string(),
            username: "alice".to_string(),
            type_id: 1,
            password: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, json!({"fullname": "Alice Reyes", "username": "alice", "type_id": 1}));
    }

    #[test]
    fn test_update_request_includes_password_when_set() {
        let request = UpdateUserRequest {
            fullname: "Alice Reyes".to_string(),
            username: "alice".to_string(),
            type_id: 1,
            password: Some("new-secret".to_string()),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["password"], "new-secret");
    }

    #[test]
    fn test_debug_output_redacts_passwords() {
        let login = LoginRequest {
            username: "alice".to_string(),
            password: "password123".to_string(),
        };
        assert!(!format!("{login:?}").contains("password123"));

        let register = RegisterRequest {
            fullname: "Alice".to_string(),
            username: "alice".to_string(),
            password: "password123".to_string(),
            type_id: PATIENT_TYPE_ID,
        };
        assert!(!format!("{register:?}").contains("password123"));
    }

    #[test]
    fn test_profile_type_id_variants() {
        let numeric: UserProfile =
            serde_json::from_value(json!({"fullname": "A", "username": "a", "type_id": 2})).unwrap();
        assert_eq!(numeric.type_id_or_fallback(), 2);

        let text: UserProfile =
            serde_json::from_value(json!({"fullname": "A", "username": "a", "type_id": "3"})).unwrap();
        assert_eq!(text.type_id_or_fallback(), 3);

        let garbage: UserProfile =
            serde_json::from_value(json!({"fullname": "A", "username": "a", "type_id": "doctor"}))
                .unwrap();
        assert_eq!(garbage.type_id_or_fallback(), FALLBACK_TYPE_ID);

        let missing: UserProfile =
            serde_json::from_value(json!({"fullname": "A", "username": "a"})).unwrap();
        assert_eq!(missing.type_id_or_fallback(), FALLBACK_TYPE_ID);
    }

    #[test]
    fn test_login_response_without_token() {
        let response: LoginResponse = serde_json::from_value(json!({"user": "alice"})).unwrap();
        assert!(response.token.is_none());
        assert_eq!(response.extra["user"], "alice");
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message": "Invalid password"}"#).as_deref(),
            Some("Invalid password")
        );
        assert_eq!(
            error_message(r#"{"error": "User not found"}"#).as_deref(),
            Some("User not found")
        );
        assert_eq!(error_message(r#"{"message": ""}"#), None);
        assert_eq!(error_message(r#"{"error": {"code": 1}}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
    }
}
