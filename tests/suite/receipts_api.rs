//! Receipt token endpoints

use emporium_receipt::validate_token;
use emporium_server::{HealthResponse, TokenResponse, VerifyResponse};
use serde_json::json;

use crate::common::start_server;

#[tokio::test]
async fn health_reports_ok() {
    let server = start_server().await;
    let body: HealthResponse = server
        .client
        .get(server.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.status, "ok");
}

#[tokio::test]
async fn issued_tokens_pass_validation() {
    let server = start_server().await;
    for _ in 0..25 {
        let body: TokenResponse = server
            .client
            .get(server.url("/api/receipts/token"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(validate_token(&body.token), "{}", body.token);
    }
}

#[tokio::test]
async fn verify_accepts_typed_lowercase_token() {
    let server = start_server().await;
    let body: VerifyResponse = server
        .client
        .post(server.url("/api/receipts/verify"))
        .json(&json!({ "token": "  rpg-qwer-tyui-3873\n" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body.valid);
    assert_eq!(body.normalized, "RPG-QWER-TYUI-3873");
    assert_eq!(body.reason, None);
}

#[tokio::test]
async fn verify_rejects_with_reason() {
    let server = start_server().await;
    let cases = [
        ("RPG-ABCD-EFGH-9999", "sum to 36"),
        ("RPG-ABCD-EFGH-953", "does not match"),
        ("XYZ-ABCD-EFGH-9534", "does not match"),
        ("", "does not match"),
    ];
    for (token, reason) in cases {
        let body: VerifyResponse = server
            .client
            .post(server.url("/api/receipts/verify"))
            .json(&json!({ "token": token }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert!(!body.valid, "{token}");
        assert!(
            body.reason.as_deref().is_some_and(|r| r.contains(reason)),
            "{token}: {:?}",
            body.reason
        );
    }
}

#[tokio::test]
async fn round_trip_through_both_endpoints() {
    let server = start_server().await;
    let issued: TokenResponse = server
        .client
        .get(server.url("/api/receipts/token"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let verdict: VerifyResponse = server
        .client
        .post(server.url("/api/receipts/verify"))
        .json(&json!({ "token": issued.token.to_lowercase() }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(verdict.valid);
    assert_eq!(verdict.normalized, issued.token);
}
