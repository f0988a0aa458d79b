//! Account creation against a stub API

use nagamed_app::auth::{sign_up, SignUpForm, SIGN_UP_FALLBACK};
use nagamed_app::Route;
use nagamed_common::ErrorKind;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;

use common::TestApp;

fn form() -> SignUpForm {
    SignUpForm {
        fullname: "Bea Cruz".to_string(),
        username: "bea".to_string(),
        password: "correct-horse".to_string(),
        confirm_password: "correct-horse".to_string(),
    }
}

#[tokio::test]
async fn test_password_mismatch_makes_no_network_call() {
    let test = TestApp::new().await.unwrap();
    let form = SignUpForm {
        confirm_password: "correct-h0rse".to_string(),
        ..form()
    };

    let err = sign_up(&test.app, &form).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.user_message(SIGN_UP_FALLBACK), "Passwords do not match.");
    assert!(test.all_requests().await.is_empty());
}

#[tokio::test]
async fn test_short_password_makes_no_network_call() {
    let test = TestApp::new().await.unwrap();
    let form = SignUpForm {
        password: "short".to_string(),
        confirm_password: "short".to_string(),
        ..form()
    };

    let err = sign_up(&test.app, &form).await.unwrap_err();
    assert_eq!(
        err.user_message(SIGN_UP_FALLBACK),
        "Password must be at least 8 characters long."
    );
    assert!(test.all_requests().await.is_empty());
}

#[tokio::test]
async fn test_registration_posts_patient_account() {
    let test = TestApp::new().await.unwrap();
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .and(body_json(json!({
            "fullname": "Bea Cruz",
            "username": "bea",
            "password": "correct-horse",
            "type_id": 1
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&test.server)
        .await;

    let next = sign_up(&test.app, &form()).await.unwrap();
    assert_eq!(next, Route::SignIn);

    // Registration does not sign the user in
    assert!(test.app.session().read().await.unwrap().is_none());
}

#[tokio::test]
async fn test_registration_failure_messages() {
    let test = TestApp::new().await.unwrap();
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Username already exists"})),
        )
        .up_to_n_times(1)
        .mount(&test.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&test.server)
        .await;

    let err = sign_up(&test.app, &form()).await.unwrap_err();
    assert_eq!(err.user_message(SIGN_UP_FALLBACK), "Username already exists");

    let err = sign_up(&test.app, &form()).await.unwrap_err();
    assert_eq!(err.user_message(SIGN_UP_FALLBACK), SIGN_UP_FALLBACK);
}
