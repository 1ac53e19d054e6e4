//! Health check handlers.

use axum::extract::State;
use axum::Json;

use techpack_core::error::AppError;

use crate::dto::response::{ApiResponse, HealthResponse, ReadyResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/health
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        service: "techpack".to_string(),
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// GET /api/health/ready
pub async fn health_ready(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReadyResponse>>, ApiError> {
    let reachable = state.grant_store.health_check().await.unwrap_or(false);
    if !reachable {
        return Err(AppError::service_unavailable("Database is not reachable").into());
    }

    Ok(Json(ApiResponse::ok(ReadyResponse {
        status: "ready".to_string(),
        database: "connected".to_string(),
    })))
}
