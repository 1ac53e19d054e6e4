//! Tech pack export handlers.
//!
//! Both endpoints stream the same rendered document; they differ only in
//! how the design is authorized. The owner path checks ownership, the
//! share path checks token validity, and neither leaks into the other.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Response, StatusCode};
use uuid::Uuid;

use techpack_core::error::AppError;

use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/designs/{id}/export
pub async fn export_own_design(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Response<Body>, ApiError> {
    let design = state.design_service.get_owned(&auth, id).await?;
    let pdf = state.techpack_service.export(&design).await?;

    pdf_response(pdf, &format!("tech-pack-{}.pdf", design.id))
}

/// GET /api/share/{token}/export
pub async fn export_shared_design(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let design = state.access_service.resolve(&token).await?;
    let pdf = state.techpack_service.export(&design).await?;

    pdf_response(pdf, "tech-pack-shared.pdf")
}

/// Builds the binary download response shared by both export paths.
fn pdf_response(pdf: Vec<u8>, filename: &str) -> Result<Response<Body>, ApiError> {
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .header(header::CONTENT_LENGTH, pdf.len())
        .header(header::CACHE_CONTROL, "no-store")
        .body(Body::from(pdf))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
