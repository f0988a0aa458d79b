//! NagaMed Remote API
//!
//! Provides access to the appointment service backend with support for:
//! - reqwest HTTP client for the real API
//! - Mock API service with an in-memory account table for tests and offline use
//! - Configurable provider and base URL

pub mod client;
pub mod mock;
pub mod models;

pub use models::{
    AccountTypeId, LoginRequest, LoginResponse, RegisterRequest, UpdateUserRequest, UserProfile,
    FALLBACK_TYPE_ID, PATIENT_TYPE_ID,
};

use thiserror::Error;

pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGIN_PATH: &str = "/api/auth/login";

/// Path of the user resource for `user_id`
pub fn user_path(user_id: &str) -> String {
    format!("/api/user/{user_id}")
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API configuration error: {0}")]
    Configuration(String),

    /// No response was received
    #[error("API request error: {0}")]
    Request(String),

    /// The server answered with a non-success status
    #[error("API response error: {status}{}", message_suffix(.message))]
    Response { status: u16, message: Option<String> },

    /// The server answered with success but an unreadable body
    #[error("API decode error ({status}): {detail}")]
    Decode { status: u16, detail: String },
}

fn message_suffix(message: &Option<String>) -> String {
    message
        .as_ref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}

impl From<ApiError> for nagamed_common::Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Configuration(message) => nagamed_common::Error::Configuration(message),
            ApiError::Request(detail) => nagamed_common::Error::transport(detail),
            ApiError::Response { status, message } => nagamed_common::Error::server(status, message),
            ApiError::Decode { status, detail } => nagamed_common::Error::FetchFailed {
                status: Some(status),
                message: None,
                detail,
            },
        }
    }
}

/// API service configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API provider (http, mock)
    pub provider: String,
    /// Base URL of the remote API, without a trailing slash
    pub base_url: String,
}

impl ApiConfig {
    /// Create API config from environment variables
    pub fn from_env() -> Result<Self, ApiError> {
        let config = nagamed_common::Config::from_env()
            .map_err(|e| ApiError::Configuration(e.to_string()))?;
        Ok(Self::from(&config))
    }
}

impl From<&nagamed_common::Config> for ApiConfig {
    fn from(config: &nagamed_common::Config) -> Self {
        Self {
            provider: config.api_provider.clone(),
            base_url: config.api_base_url.clone(),
        }
    }
}

/// Remote API operations used by the client.
///
/// `authorization` is sent verbatim (trimmed) as the `Authorization` header.
#[async_trait::async_trait]
pub trait ApiService: Send + Sync {
    /// `POST /api/auth/register`
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError>;

    /// `POST /api/auth/login`
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    /// `GET /api/user/{id}`
    async fn get_user(&self, user_id: &str, authorization: &str) -> Result<UserProfile, ApiError>;

    /// `PUT /api/user/{id}`
    async fn update_user(
        &self,
        user_id: &str,
        authorization: &str,
        request: &UpdateUserRequest,
    ) -> Result<(), ApiError>;

    /// `DELETE /api/user/{id}`
    async fn delete_user(&self, user_id: &str, authorization: &str) -> Result<(), ApiError>;
}

/// Factory for creating ApiService implementations
pub struct ApiServiceFactory;

impl ApiServiceFactory {
    /// Create an ApiService based on configuration
    pub fn create(config: ApiConfig) -> Result<Box<dyn ApiService>, ApiError> {
        match config.provider.as_str() {
            "http" => {
                tracing::info!(base_url = %config.base_url, "Creating HTTP API client");
                if config.base_url.is_empty() {
                    return Err(ApiError::Configuration(
                        "NAGAMED_API_BASE_URL is required for the http provider".to_string(),
                    ));
                }
                Ok(Box::new(client::HttpApiClient::new(config)))
            }
            "mock" => {
                tracing::info!("Creating mock API service");
                Ok(Box::new(mock::MockApiService::with_demo_account()))
            }
            provider => Err(ApiError::Configuration(format!(
                "Unknown API provider: {}. Supported providers: http, mock",
                provider
            ))),
        }
    }
}
