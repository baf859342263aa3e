//! HTTP API for Emporium.
//!
//! Store documents are read and written through a shared
//! [`StoreRepository`]; receipt tokens are issued and checked statelessly.
//!
//! ```text
//! GET    /api/stores              list all stores
//! GET    /api/stores/{slug}       one store, 404 when unknown
//! POST   /api/stores              upsert by id
//! DELETE /api/stores/{id}         remove by id
//! GET    /api/receipts/token      issue a fresh token
//! POST   /api/receipts/verify     check a typed token
//! GET    /health                  liveness
//! ```

mod routes;

use std::future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio::signal;

use emporium_store::StoreRepository;

pub use routes::{
    ErrorResponse, HealthResponse, MessageResponse, TokenResponse, VerifyRequest, VerifyResponse,
};

/// Shared handler state. rusqlite connections are not `Sync`, so the
/// repository sits behind a mutex.
pub type AppState = Arc<Mutex<StoreRepository>>;

#[must_use]
pub fn app_state(repository: StoreRepository) -> AppState {
    Arc::new(Mutex::new(repository))
}

pub fn router(state: AppState) -> Router {
    // GET and DELETE share one pattern; axum rejects two names for the same segment.
    Router::new()
        .route("/api/stores", get(routes::list_stores).post(routes::save_store))
        .route(
            "/api/stores/{key}",
            get(routes::get_store).delete(routes::delete_store),
        )
        .route("/api/receipts/token", get(routes::issue_token))
        .route("/api/receipts/verify", post(routes::verify_token))
        .route("/health", get(routes::health))
        .with_state(state)
}

/// Serve on an already bound listener until the future is dropped.
pub async fn serve_on(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state))
        .await
        .context("HTTP server failed")
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: SocketAddr, repository: StoreRepository) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local = listener.local_addr().context("Failed to read bound address")?;
    tracing::info!(addr = %local, "Emporium API listening");

    axum::serve(listener, router(app_state(repository)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("Emporium API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {e}");
        future::pending::<()>().await;
    }
}
