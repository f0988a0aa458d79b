//! NagaMed HTTP Client Implementation
//!
//! Real HTTP client for the remote API at `{base_url}/api/...`. No timeout
//! is configured beyond reqwest's defaults and nothing is retried.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::models::error_message;
use crate::{
    user_path, ApiConfig, ApiError, ApiService, LoginRequest, LoginResponse, RegisterRequest,
    UpdateUserRequest, UserProfile, LOGIN_PATH, REGISTER_PATH,
};

/// Real HTTP client for the NagaMed API
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpApiClient {
    /// Create a new client from configuration
    pub fn new(config: ApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and turn non-success statuses into `ApiError::Response`
    async fn send(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<Response, ApiError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(operation, error = %e, "API request failed");
                ApiError::Request(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read response body".to_string());
            let message = error_message(&body);
            tracing::debug!(operation, status = status.as_u16(), ?message, "API returned an error");
            return Err(ApiError::Response {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(operation, status = status.as_u16(), "API request succeeded");
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status().as_u16();
        response.json::<T>().await.map_err(|e| ApiError::Decode {
            status,
            detail: e.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl ApiService for HttpApiClient {
    async fn register(&self, request: &RegisterRequest) -> Result<(), ApiError> {
        let builder = self.http.post(self.url(REGISTER_PATH)).json(request);
        let response = self.send(builder, "register").await?;

        // Any other 2xx is treated as an unexpected outcome
        match response.status() {
            StatusCode::OK | StatusCode::CREATED => Ok(()),
            status => Err(ApiError::Response {
                status: status.as_u16(),
                message: None,
            }),
        }
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        let builder = self.http.post(self.url(LOGIN_PATH)).json(request);
        let response = self.send(builder, "login").await?;
        Self::json(response).await
    }

    async fn get_user(&self, user_id: &str, authorization: &str) -> Result<UserProfile, ApiError> {
        let builder = self
            .http
            .get(self.url(&user_path(user_id)))
            .header(AUTHORIZATION, authorization.trim());
        let response = self.send(builder, "get_user").await?;
        Self::json(response).await
    }

    async fn update_user(
        &self,
        user_id: &str,
        authorization: &str,
        request: &UpdateUserRequest,
    ) -> Result<(), ApiError> {
        let builder = self
            .http
            .put(self.url(&user_path(user_id)))
            .header(AUTHORIZATION, authorization.trim())
            .json(request);
        self.send(builder, "update_user").await?;
        Ok(())
    }

    async fn delete_user(&self, user_id: &str, authorization: &str) -> Result<(), ApiError> {
        let builder = self
            .http
            .delete(self.url(&user_path(user_id)))
            .header(AUTHORIZATION, authorization.trim());
        self.send(builder, "delete_user").await?;
        Ok(())
    }
}
