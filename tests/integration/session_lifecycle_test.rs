//! Sign-in, authenticated fetch and logout against a stub API

use nagamed_app::auth::{sign_in, SignInForm, SIGN_IN_FALLBACK};
use nagamed_app::home::load_home;
use nagamed_app::identity::{GUEST_NAME, IDENTITY_ERROR_MESSAGE};
use nagamed_app::profile::logout;
use nagamed_app::Route;
use nagamed_common::{ErrorKind, NETWORK_ERROR_MESSAGE};
use nagamed_session::{AUTH_TOKEN_KEY, USER_ID_KEY};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;

use common::{header_value, mint_token, TestApp};

fn alice() -> SignInForm {
    SignInForm {
        username: "alice".to_string(),
        password: "password123".to_string(),
    }
}

async fn mount_login(test: &TestApp, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "alice", "password": "password123"})))
        .respond_with(response)
        .mount(&test.server)
        .await;
}

#[tokio::test]
async fn test_login_then_profile_fetch_uses_stored_credentials() {
    let test = TestApp::new().await.unwrap();
    let token = mint_token(json!({"id": 42, "username": "alice"}));
    mount_login(
        &test,
        ResponseTemplate::new(200).set_body_json(json!({"token": token})),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/api/user/42"))
        .and(header("authorization", token.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "fullname": "Alice Reyes",
            "username": "alice",
            "type_id": 1
        })))
        .expect(1)
        .mount(&test.server)
        .await;

    let next = sign_in(&test.app, &alice()).await.unwrap();
    assert_eq!(next, Route::Home);

    let entries = test.stored_entries().unwrap();
    assert_eq!(entries.get(USER_ID_KEY).map(String::as_str), Some("42"));
    assert_eq!(entries.get(AUTH_TOKEN_KEY), Some(&token));

    let home = load_home(&test.app).await;
    assert_eq!(home.greeting(), "Good day, Alice Reyes!");

    let fetches = test.requests_to("GET", "/api/user/42").await;
    assert_eq!(fetches.len(), 1);
    assert_eq!(header_value(&fetches[0], "authorization"), Some(token.clone()));
    assert!(!token.starts_with("Bearer"));
}

#[tokio::test]
async fn test_token_without_id_leaves_session_absent() {
    let test = TestApp::new().await.unwrap();
    let token = mint_token(json!({"username": "alice"}));
    mount_login(
        &test,
        ResponseTemplate::new(200).set_body_json(json!({"token": token})),
    )
    .await;

    let err = sign_in(&test.app, &alice()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Token);
    assert_eq!(err.user_message(SIGN_IN_FALLBACK), "Missing `id` in token");
    assert!(test.stored_entries().unwrap().is_empty());
}

#[tokio::test]
async fn test_response_without_token_leaves_session_absent() {
    let test = TestApp::new().await.unwrap();
    mount_login(
        &test,
        ResponseTemplate::new(200).set_body_json(json!({"user": {"id": 42}})),
    )
    .await;

    let err = sign_in(&test.app, &alice()).await.unwrap_err();
    assert_eq!(err.user_message(SIGN_IN_FALLBACK), "Missing token in response");
    assert!(test.stored_entries().unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_login_shows_server_message() {
    let test = TestApp::new().await.unwrap();
    mount_login(
        &test,
        ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid password"})),
    )
    .await;

    let err = sign_in(&test.app, &alice()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.user_message(SIGN_IN_FALLBACK), "Invalid password");
    assert!(test.stored_entries().unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_login_without_payload_uses_fallback() {
    let test = TestApp::new().await.unwrap();
    mount_login(&test, ResponseTemplate::new(503)).await;

    let err = sign_in(&test.app, &alice()).await.unwrap_err();
    assert_eq!(err.user_message(SIGN_IN_FALLBACK), SIGN_IN_FALLBACK);
}

#[tokio::test]
async fn test_unreachable_api_shows_network_error() {
    let test = TestApp::new().await.unwrap();
    let app = {
        let dir = tempfile::tempdir().unwrap();
        let config = nagamed_common::Config {
            api_base_url: "http://127.0.0.1:1".to_string(),
            api_provider: "http".to_string(),
            session_provider: "file".to_string(),
            session_path: dir.path().join("session.json"),
            rust_log: "nagamed=debug".to_string(),
        };
        nagamed_app::App::from_config(&config).unwrap()
    };

    let err = sign_in(&app, &alice()).await.unwrap_err();
    assert_eq!(err.user_message(SIGN_IN_FALLBACK), NETWORK_ERROR_MESSAGE);
    assert!(test.all_requests().await.is_empty());
}

#[tokio::test]
async fn test_expired_token_degrades_to_guest_with_error() {
    let test = TestApp::new().await.unwrap();
    let token = mint_token(json!({"id": 7}));
    test.app.session().establish("7", &token).await.unwrap();

    Mock::given(method("GET"))
        .and(path("/api/user/7"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Token expired"})))
        .mount(&test.server)
        .await;

    let home = load_home(&test.app).await;
    assert_eq!(home.identity.name, GUEST_NAME);
    assert_eq!(home.identity.error.as_deref(), Some(IDENTITY_ERROR_MESSAGE));

    // The stored session is left for the user to clear
    assert!(test.app.session().read().await.unwrap().is_some());
}

#[tokio::test]
async fn test_logout_clears_session_without_server_call() {
    let test = TestApp::new().await.unwrap();
    test.app
        .session()
        .establish("42", &mint_token(json!({"id": 42})))
        .await
        .unwrap();

    assert_eq!(logout(&test.app).await.unwrap(), Route::SignIn);
    assert_eq!(logout(&test.app).await.unwrap(), Route::SignIn);

    assert!(test.stored_entries().unwrap().is_empty());
    assert!(test.all_requests().await.is_empty());

    let home = load_home(&test.app).await;
    assert_eq!(home.greeting(), "Good day, Guest!");
    assert!(test.all_requests().await.is_empty());
}
