//! Shared test utilities and fixtures
//!
//! Boots the HTTP API on an ephemeral port and hands back a client for it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use emporium_server::app_state;
use emporium_store::StoreRepository;
use emporium_types::{Slug, StoreConfig, StoreId};

pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start a server over an in-memory repository seeded with the default store.
pub async fn start_server() -> TestServer {
    let mut repo = StoreRepository::open_in_memory().unwrap();
    repo.seed_default_if_empty().unwrap();
    start_with(repo).await
}

/// Start a server over an on-disk repository at `path`.
pub async fn start_on_disk(path: &Path) -> TestServer {
    start_with(StoreRepository::open(path).unwrap()).await
}

pub async fn start_with(repo: StoreRepository) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let _ = emporium_server::serve_on(listener, app_state(repo)).await;
    });
    TestServer {
        addr,
        client: reqwest::Client::new(),
        handle,
    }
}

/// A store cloned from the default template with the given id and slug.
pub fn store(id: &str, slug: &str, name: &str) -> StoreConfig {
    StoreConfig {
        id: StoreId::new(id).unwrap(),
        slug: Slug::parse(slug).unwrap(),
        store_name: name.to_string(),
        ..StoreConfig::default_store()
    }
}
