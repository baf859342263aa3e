//! Store document endpoints

use reqwest::StatusCode;
use serde_json::Value;

use emporium_server::{ErrorResponse, MessageResponse};
use emporium_types::StoreConfig;

use crate::common::{start_server, store};

#[tokio::test]
async fn list_starts_with_default_store() {
    let server = start_server().await;
    let stores: Vec<Value> = server
        .client
        .get(server.url("/api/stores"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0]["slug"], StoreConfig::DEFAULT_SLUG);
    assert_eq!(stores[0]["storeName"], "O Empório do Dragão Dourado");
    assert!(stores[0]["createdAt"].is_string());
}

#[tokio::test]
async fn get_by_slug() {
    let server = start_server().await;
    let response = server
        .client
        .get(server.url("/api/stores/emporio-padrao"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: StoreConfig = response.json().await.unwrap();
    assert_eq!(body, StoreConfig::default_store());
}

#[tokio::test]
async fn unknown_slug_is_404_with_message() {
    let server = start_server().await;
    let response = server
        .client
        .get(server.url("/api/stores/nowhere"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: MessageResponse = response.json().await.unwrap();
    assert_eq!(body.message, "store not found");
}

#[tokio::test]
async fn post_creates_then_replaces() {
    let server = start_server().await;

    let created: Value = server
        .client
        .post(server.url("/api/stores"))
        .json(&store("1700000001234", "loja-1234", "Nova Loja RPG"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["slug"], "loja-1234");

    let replaced: Value = server
        .client
        .post(server.url("/api/stores"))
        .json(&store("1700000001234", "forja-ana", "Forja Anã"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(replaced["storeName"], "Forja Anã");
    assert_eq!(replaced["createdAt"], created["createdAt"]);

    let old = server
        .client
        .get(server.url("/api/stores/loja-1234"))
        .send()
        .await
        .unwrap();
    assert_eq!(old.status(), StatusCode::NOT_FOUND);

    let stores: Vec<Value> = server
        .client
        .get(server.url("/api/stores"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stores.len(), 2);
}

#[tokio::test]
async fn slug_collision_is_conflict() {
    let server = start_server().await;
    let response = server
        .client
        .post(server.url("/api/stores"))
        .json(&store("other", StoreConfig::DEFAULT_SLUG, "Impostor"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: ErrorResponse = response.json().await.unwrap();
    assert!(body.error.contains(StoreConfig::DEFAULT_SLUG));
}

#[tokio::test]
async fn invalid_slug_is_rejected_before_storage() {
    let server = start_server().await;
    let mut doc = serde_json::to_value(StoreConfig::default_store()).unwrap();
    doc["id"] = "x".into();
    doc["slug"] = "Not A Slug".into();
    let response = server
        .client
        .post(server.url("/api/stores"))
        .json(&doc)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let server = start_server().await;
    for _ in 0..2 {
        let body: MessageResponse = server
            .client
            .delete(server.url("/api/stores/default"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body.message, "removed");
    }
    let stores: Vec<Value> = server
        .client
        .get(server.url("/api/stores"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(stores.is_empty());
}
