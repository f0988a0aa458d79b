//! Common test utilities and fixtures for integration tests
//!
//! This module provides shared infrastructure for all integration tests including:
//! - A stub remote API served by wiremock
//! - A file-backed session in a temporary directory
//! - Token minting and scripted confirmation answers

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Result;
use jsonwebtoken::{encode, EncodingKey, Header};
use nagamed_app::deletion::{ConfirmationPrompt, Confirmer};
use nagamed_app::App;
use nagamed_common::Config;
use serde_json::Value;
use tempfile::TempDir;
use wiremock::{MockServer, Request};

/// Application wired to a stub API and a throwaway session file
#[allow(dead_code)]
pub struct TestApp {
    pub app: App,
    pub server: MockServer,
    pub session_path: PathBuf,
    _dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Result<Self> {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir()?;
        let session_path = dir.path().join("nagamed").join("session.json");

        let config = Config {
            api_base_url: server.uri(),
            api_provider: "http".to_string(),
            session_provider: "file".to_string(),
            session_path: session_path.clone(),
            rust_log: "nagamed=debug".to_string(),
        };
        let app = App::from_config(&config)?;

        Ok(Self {
            app,
            server,
            session_path,
            _dir: dir,
        })
    }

    /// Entries currently persisted in the session file
    pub fn stored_entries(&self) -> Result<BTreeMap<String, String>> {
        match std::fs::read_to_string(&self.session_path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Requests the stub received for `method` and `path`
    pub async fn requests_to(&self, method: &str, path: &str) -> Vec<Request> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.method.as_str() == method && request.url.path() == path)
            .collect()
    }

    /// Every request the stub received
    pub async fn all_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}

/// Sign `claims` the way the backend would; the client never checks the key
#[allow(dead_code)]
pub fn mint_token(claims: Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"backend-only-secret"),
    )
    .expect("Failed to encode JWT")
}

/// Header value of a recorded request
#[allow(dead_code)]
pub fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Answers prompts from a fixed script and records what was asked
#[allow(dead_code)]
pub struct ScriptedConfirmer {
    answers: Mutex<Vec<bool>>,
    asked: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedConfirmer {
    pub fn new(answers: &[bool]) -> Self {
        let mut answers = answers.to_vec();
        answers.reverse();
        Self {
            answers: Mutex::new(answers),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().expect("asked lock poisoned").clone()
    }
}

#[async_trait::async_trait]
impl Confirmer for ScriptedConfirmer {
    async fn confirm(&self, prompt: &ConfirmationPrompt) -> bool {
        self.asked
            .lock()
            .expect("asked lock poisoned")
            .push(prompt.title.to_string());
        self.answers
            .lock()
            .expect("answers lock poisoned")
            .pop()
            .unwrap_or(false)
    }
}
