//! Maps domain `AppError` to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use techpack_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Wrapper giving `AppError` an HTTP rendering.
///
/// Handlers return `Result<_, ApiError>` and the `?` operator converts
/// from `AppError` on the way out.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let (status, error_code) = match &err.kind {
            ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            ErrorKind::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
            ErrorKind::Database | ErrorKind::ServiceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            ErrorKind::Internal
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::ExternalService => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(kind = %err.kind, error = %err.message, "Request failed");
        }

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message: err.message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_for(err: AppError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn kinds_map_to_expected_statuses() {
        assert_eq!(
            status_for(AppError::validation("bad input")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(AppError::unauthorized("no token")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(AppError::forbidden("not yours")),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(AppError::not_found("missing")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(AppError::database("pool gone")),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(AppError::external_service("host down")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(AppError::internal("bug")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn body_carries_code_and_message() {
        let body = ApiErrorResponse {
            error: "NOT_FOUND".to_string(),
            message: "Design not found".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["error"], "NOT_FOUND");
        assert_eq!(json["message"], "Design not found");
    }
}
