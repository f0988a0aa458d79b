//! Mock API Service Implementation
//!
//! In-memory stand-in for the remote backend. Keeps an account table, issues
//! real (unverifiable) JWTs on login and records every call for test
//! assertions. Failures can be queued to simulate an unreachable server or
//! an error status. Thread-safe via `Arc<Mutex<>>`.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use crate::{
    user_path, AccountTypeId, ApiError, ApiService, LoginRequest, LoginResponse, RegisterRequest,
    UpdateUserRequest, UserProfile, LOGIN_PATH, PATIENT_TYPE_ID, REGISTER_PATH,
};

const MOCK_SIGNING_SECRET: &[u8] = b"nagamed-mock-backend";

pub const DEMO_USERNAME: &str = "alice";
pub const DEMO_PASSWORD: &str = "password123";

/// Remote operation a recorded call targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    Register,
    Login,
    GetUser,
    UpdateUser,
    DeleteUser,
}

/// A request as the backend would have seen it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: ApiOperation,
    pub method: &'static str,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

/// Failure injected into the next call
#[derive(Debug, Clone)]
pub enum MockFailure {
    /// No response at all
    Transport(String),
    /// The server answers with this status and optional message
    Status { status: u16, message: Option<String> },
}

/// How the mock answers a login with valid credentials
#[derive(Debug, Clone, Default)]
pub enum MockLogin {
    #[default]
    Issue,
    Respond(LoginResponse),
}

#[derive(Debug, Clone)]
struct MockAccount {
    fullname: String,
    username: String,
    password: String,
    type_id: i64,
}

#[derive(Debug)]
struct MockState {
    accounts: BTreeMap<i64, MockAccount>,
    next_id: i64,
    tokens: HashMap<String, i64>,
    issued: u64,
    calls: Vec<RecordedCall>,
    failures: VecDeque<MockFailure>,
    login: MockLogin,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            accounts: BTreeMap::new(),
            next_id: 1,
            tokens: HashMap::new(),
            issued: 0,
            calls: Vec::new(),
            failures: VecDeque::new(),
            login: MockLogin::Issue,
        }
    }
}

impl MockState {
    fn issue_token(&mut self, user_id: i64) -> Result<String, ApiError> {
        let username = self
            .accounts
            .get(&user_id)
            .map(|account| account.username.clone())
            .unwrap_or_default();
        self.issued += 1;
        let claims = json!({ "id": user_id, "username": username, "jti": self.issued });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(MOCK_SIGNING_SECRET),
        )
        .map_err(|e| ApiError::Configuration(format!("mock token signing failed: {e}")))?;
        self.tokens.insert(token.clone(), user_id);
        Ok(token)
    }

    /// Resolve the account targeted by `user_id`, enforcing ownership
    fn authorize(&self, user_id: &str, authorization: &str) -> Result<i64, ApiError> {
        let owner = self.tokens.get(authorization.trim()).copied();
        let target = user_id.trim().parse::<i64>().ok();

        match (owner, target) {
            (Some(owner), Some(target)) if owner == target => {
                if self.accounts.contains_key(&target) {
                    Ok(target)
                } else {
                    Err(status_error(404, "User not found"))
                }
            }
            (Some(_), None) => Err(status_error(404, "User not found")),
            _ => Err(status_error(401, "Unauthorized")),
        }
    }

    fn username_taken(&self, username: &str, except: Option<i64>) -> bool {
        self.accounts
            .iter()
            .any(|(id, account)| Some(*id) != except && account.username == username)
    }
}

fn status_error(status: u16, message: &str) -> ApiError {
    ApiError::Response {
        status,
        message: Some(message.to_string()),
    }
}

/// Mock API service backed by an in-memory account table
#[derive(Debug, Clone, Default)]
pub struct MockApiService {
    state: Arc<Mutex<MockState>>,
}

impl MockApiService {
    /// Create an empty backend with no accounts
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend seeded with the demo account `alice` / `password123`
    pub fn with_demo_account() -> Self {
        let service = Self::new();
        service.seed_account("Alice Reyes", DEMO_USERNAME, DEMO_PASSWORD, PATIENT_TYPE_ID);
        service
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an account and return its id
    pub fn seed_account(&self, fullname: &str, username: &str, password: &str, type_id: i64) -> i64 {
        let mut state = self.state();
        let id = state.next_id;
        state.next_id += 1;
        state.accounts.insert(
            id,
            MockAccount {
                fullname: fullname.to_string(),
                username: username.to_string(),
                password: password.to_string(),
                type_id,
            },
        );
        id
    }

    /// Issue a token for an existing account without going through login
    pub fn issue_token(&self, user_id: i64) -> Result<String, ApiError> {
        self.state().issue_token(user_id)
    }

    /// Profile of an account as the backend currently stores it
    pub fn account(&self, user_id: i64) -> Option<UserProfile> {
        self.state().accounts.get(&user_id).map(|account| UserProfile {
            fullname: account.fullname.clone(),
            username: account.username.clone(),
            type_id: Some(AccountTypeId::Number(account.type_id)),
        })
    }

    /// Current password of an account
    pub fn password_of(&self, user_id: i64) -> Option<String> {
        self.state()
            .accounts
            .get(&user_id)
            .map(|account| account.password.clone())
    }

    /// Queue a failure for the next call
    pub fn fail_next(&self, failure: MockFailure) {
        self.state().failures.push_back(failure);
    }

    /// Change how valid logins are answered
    pub fn set_login(&self, login: MockLogin) {
        self.state().login = login;
    }

    /// Return all recorded calls.
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.state().calls.clone()
    }

    /// Recorded calls for one operation
    pub fn calls_for(&self, operation: ApiOperation) -> Vec<RecordedCall> {
        self.state()
            .calls
            .iter()
            .filter(|call| call.operation == operation)
            .cloned()
            .collect()
    }

    /// Clear recorded calls and queued failures.
    pub fn reset(&self) {
        let mut state = self.state();
        state.calls.clear();
        state.failures.clear();
    }

    /// Record the call, then fail it if a failure was queued
    fn begin(&self, call: RecordedCall) -> Result<MutexGuard<'_, MockState>, ApiError> {
        tracing::debug!(operation = ?call.operation, path = %call.path, "Mock API: recording call");
        let mut state = self.state();
        state.calls.push(call);

        match state.failures.pop_front() {
            None => Ok(state),
            Some(MockFailure::Transport(detail)) => Err(ApiError::Request(detail)),
            Some(MockFailure::Status { status, message }) => {
                Err(ApiError::Response { status, message })
            }
        }
    }
}

#[async_trait::async_trait]
impl ApiService for MockApiService {
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let mut state = self.begin(RecordedCall {
            operation: ApiOperation::Register,
            method: "POST",
            path: REGISTER_PATH.to_string(),
            authorization: None,
            body: serde_json::to_value(request).ok(),
        })?;

        if state.username_taken(&request.username, None) {
            return Err(status_error(409, "Username already exists"));
        }

        let id = state.next_id;
        state.next_id += 1;
        state.accounts.insert(
            id,
            MockAccount {
                fullname: request.fullname.clone(),
                username: request.username.clone(),
                password: request.password.clone(),
                type_id: request.type_id,
            },
        );
        Ok(())
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let mut state = self.begin(RecordedCall {
            operation: ApiOperation::Login,
            method: "POST",
            path: LOGIN_PATH.to_string(),
            authorization: None,
            body: serde_json::to_value(request).ok(),
        })?;

        let user_id = state
            .accounts
            .iter()
            .find(|(_, account)| {
                account.username == request.username && account.password == request.password
            })
            .map(|(id, _)| *id)
            .ok_or_else(|| status_error(401, "Invalid username or password"))?;

        match state.login.clone() {
            MockLogin::Respond(response) => Ok(response),
            MockLogin::Issue => {
                let token = state.issue_token(user_id)?;
                Ok(LoginResponse {
                    token: Some(token),
                    ..Default::default()
                })
            }
        }
    }

    async fn get_user(&self, user_id: &str, authorization: &str) -> Result<UserProfile, ApiError> {
        let state = self.begin(RecordedCall {
            operation: ApiOperation::GetUser,
            method: "GET",
            path: user_path(user_id),
            authorization: Some(authorization.trim().to_string()),
            body: None,
        })?;

        let id = state.authorize(user_id, authorization)?;
        let account = state
            .accounts
            .get(&id)
            .ok_or_else(|| status_error(404, "User not found"))?;
        Ok(UserProfile {
            fullname: account.fullname.clone(),
            username: account.username.clone(),
            type_id: Some(AccountTypeId::Number(account.type_id)),
        })
    }

    async fn update_user(
        &self,
        user_id: &str,
        authorization: &str,
        request: &UpdateUserRequest,
    ) -> Result<(), ApiError> {
        let mut state = self.begin(RecordedCall {
            operation: ApiOperation::UpdateUser,
            method: "PUT",
            path: user_path(user_id),
            authorization: Some(authorization.trim().to_string()),
            body: serde_json::to_value(request).ok(),
        })?;

        let id = state.authorize(user_id, authorization)?;
        if state.username_taken(&request.username, Some(id)) {
            return Err(status_error(409, "Username already taken"));
        }

        let account = state
            .accounts
            .get_mut(&id)
            .ok_or_else(|| status_error(404, "User not found"))?;
        account.fullname = request.fullname.clone();
        account.username = request.username.clone();
        account.type_id = request.type_id;
        if let Some(password) = &request.password {
            account.password = password.clone();
        }
        Ok(())
    }

    async fn delete_user(&self, user_id: &str, authorization: &str) -> Result<(), ApiError> {
        let mut state = self.begin(RecordedCall {
            operation: ApiOperation::DeleteUser,
            method: "DELETE",
            path: user_path(user_id),
            authorization: Some(authorization.trim().to_string()),
            body: None,
        })?;

        let id = state.authorize(user_id, authorization)?;
        state.accounts.remove(&id);
        state.tokens.retain(|_, owner| *owner != id);
        Ok(())
    }
}
