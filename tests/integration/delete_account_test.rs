//! Two-step account deletion against a stub API

use nagamed_app::deletion::{delete_account, DeletionOutcome, DELETE_ACCOUNT_FALLBACK};
use nagamed_app::Route;
use nagamed_common::MISSING_SESSION_MESSAGE;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;

use common::{mint_token, ScriptedConfirmer, TestApp};

async fn signed_in() -> (TestApp, String) {
    let test = TestApp::new().await.unwrap();
    let token = mint_token(json!({"id": 42}));
    test.app.session().establish("42", &token).await.unwrap();
    (test, token)
}

#[tokio::test]
async fn test_delete_after_two_confirmations() {
    let (test, token) = signed_in().await;
    Mock::given(method("DELETE"))
        .and(path("/api/user/42"))
        .and(header("authorization", token.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Deleted"})))
        .expect(1)
        .mount(&test.server)
        .await;

    let confirmer = ScriptedConfirmer::new(&[true, true]);
    let outcome = delete_account(&test.app, &confirmer).await.unwrap();

    assert_eq!(outcome, DeletionOutcome::Deleted(Route::SignIn));
    assert_eq!(confirmer.asked(), vec!["Confirm Deletion", "Final Confirmation"]);
    assert!(test.stored_entries().unwrap().is_empty());
}

#[tokio::test]
async fn test_declining_either_prompt_sends_nothing() {
    for answers in [&[false][..], &[true, false][..]] {
        let (test, _) = signed_in().await;
        let before = test.stored_entries().unwrap();

        let confirmer = ScriptedConfirmer::new(answers);
        let outcome = delete_account(&test.app, &confirmer).await.unwrap();

        assert_eq!(outcome, DeletionOutcome::Declined);
        assert_eq!(confirmer.asked().len(), answers.len());
        assert!(test.requests_to("DELETE", "/api/user/42").await.is_empty());
        assert_eq!(test.stored_entries().unwrap(), before);
    }
}

#[tokio::test]
async fn test_guest_cannot_start_deletion() {
    let test = TestApp::new().await.unwrap();
    let confirmer = ScriptedConfirmer::new(&[true, true]);

    let err = delete_account(&test.app, &confirmer).await.unwrap_err();
    assert_eq!(err.user_message(DELETE_ACCOUNT_FALLBACK), MISSING_SESSION_MESSAGE);
    assert!(confirmer.asked().is_empty());
    assert!(test.all_requests().await.is_empty());
}

#[tokio::test]
async fn test_server_refusal_keeps_session() {
    let (test, _) = signed_in().await;
    Mock::given(method("DELETE"))
        .and(path("/api/user/42"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"error": "Forbidden"})))
        .mount(&test.server)
        .await;
    let before = test.stored_entries().unwrap();

    let confirmer = ScriptedConfirmer::new(&[true, true]);
    let err = delete_account(&test.app, &confirmer).await.unwrap_err();

    assert_eq!(err.user_message(DELETE_ACCOUNT_FALLBACK), "Forbidden");
    assert_eq!(test.stored_entries().unwrap(), before);
}

#[tokio::test]
async fn test_server_error_without_payload_uses_fallback() {
    let (test, _) = signed_in().await;
    Mock::given(method("DELETE"))
        .and(path("/api/user/42"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&test.server)
        .await;

    let confirmer = ScriptedConfirmer::new(&[true, true]);
    let err = delete_account(&test.app, &confirmer).await.unwrap_err();
    assert_eq!(err.user_message(DELETE_ACCOUNT_FALLBACK), DELETE_ACCOUNT_FALLBACK);
}
