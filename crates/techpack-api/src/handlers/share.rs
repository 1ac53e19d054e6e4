//! Share link issuance and public resolution handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::dto::request::ShareLinkQuery;
use crate::dto::response::{ApiResponse, ShareLinkResponse, SharedDesignResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/designs/{id}/share
///
/// Owner-only. Returns the design's live share link, minting or rotating
/// one according to the query parameters.
pub async fn issue_share_link(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Query(query): Query<ShareLinkQuery>,
) -> Result<Json<ApiResponse<ShareLinkResponse>>, ApiError> {
    let design = state.design_service.get_owned(&auth, id).await?;

    let grant = state
        .share_service
        .issue(design.id, query.ttl_minutes, query.wants_rotation())
        .await?;

    Ok(Json(ApiResponse::ok(ShareLinkResponse {
        token: grant.token,
        expires_at: grant.expires_at,
    })))
}

/// GET /api/share/{token}
///
/// Anonymous. Resolves a share token to the design snapshot it grants
/// access to. Invalid and expired tokens are indistinguishable.
pub async fn resolve_share_link(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<SharedDesignResponse>>, ApiError> {
    let design = state.access_service.resolve(&token).await?;
    Ok(Json(ApiResponse::ok(SharedDesignResponse::from(design))))
}
