//! On-disk repository behind the API

use serde_json::Value;

use crate::common::{start_on_disk, store};

#[tokio::test]
async fn stores_survive_server_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("stores.db");

    {
        let server = start_on_disk(&path).await;
        let response = server
            .client
            .post(server.url("/api/stores"))
            .json(&store("42", "taverna", "Taverna do Pônei"))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    let server = start_on_disk(&path).await;
    let found: Value = server
        .client
        .get(server.url("/api/stores/taverna"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found["id"], "42");
    assert_eq!(found["storeName"], "Taverna do Pônei");
}
