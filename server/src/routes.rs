//! HTTP route handlers.

use std::sync::MutexGuard;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use emporium_receipt::{TokenRejection, TokenVerifier, VerificationStatus, generate_token};
use emporium_store::{StoreError, StoreRepository, StoredStore};
use emporium_types::StoreConfig;

use crate::AppState;

type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// RESPONSE TYPES
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub status: VerificationStatus,
    pub normalized: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ============================================================================
// STORES
// ============================================================================

/// GET /api/stores
pub async fn list_stores(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredStore>>, ApiError> {
    let repo = lock(&state)?;
    repo.list().map(Json).map_err(store_error)
}

/// GET /api/stores/{slug}
///
/// A miss answers 404 with `{"message": "store not found"}`.
pub async fn get_store(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<StoredStore>, Response> {
    let repo = lock(&state).map_err(IntoResponse::into_response)?;
    let found = repo
        .find_by_slug(&slug)
        .map_err(|e| store_error(e).into_response())?;
    found.map(Json).ok_or_else(|| {
        tracing::debug!(slug = %slug, "store lookup missed");
        (
            StatusCode::NOT_FOUND,
            Json(MessageResponse {
                message: "store not found".to_string(),
            }),
        )
            .into_response()
    })
}

/// POST /api/stores
///
/// Upserts the body by `id`. Last write wins.
pub async fn save_store(
    State(state): State<AppState>,
    Json(config): Json<StoreConfig>,
) -> Result<Json<StoredStore>, ApiError> {
    let mut repo = lock(&state)?;
    repo.upsert(&config).map(Json).map_err(store_error)
}

/// DELETE /api/stores/{id}
///
/// Succeeds whether or not the id existed.
pub async fn delete_store(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let mut repo = lock(&state)?;
    repo.delete(&id).map_err(store_error)?;
    Ok(Json(MessageResponse {
        message: "removed".to_string(),
    }))
}

// ============================================================================
// RECEIPTS
// ============================================================================

/// GET /api/receipts/token
pub async fn issue_token() -> Json<TokenResponse> {
    Json(TokenResponse {
        token: generate_token().into(),
    })
}

/// POST /api/receipts/verify
///
/// The submitted text is trimmed and uppercased before validation. Blank
/// input is never checked and reports `idle`.
pub async fn verify_token(Json(request): Json<VerifyRequest>) -> Json<VerifyResponse> {
    let mut verifier = TokenVerifier::new();
    verifier.set_input(&request.token);
    let status = verifier.submit();
    let valid = status == VerificationStatus::Valid;
    let reason = (!valid).then(|| {
        verifier
            .last_rejection()
            .unwrap_or(TokenRejection::Malformed)
            .to_string()
    });
    Json(VerifyResponse {
        valid,
        status,
        normalized: verifier.input().to_string(),
        reason,
    })
}

// ============================================================================
// UTILITY ENDPOINTS
// ============================================================================

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

fn lock(state: &AppState) -> Result<MutexGuard<'_, StoreRepository>, ApiError> {
    state.lock().map_err(|_| {
        tracing::error!("store repository mutex poisoned");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: "store repository unavailable".to_string(),
            }),
        )
    })
}

fn store_error(err: StoreError) -> ApiError {
    let status = match &err {
        StoreError::SlugTaken { .. } => StatusCode::CONFLICT,
        _ => {
            tracing::error!("store repository error: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
