//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use techpack_entity::design::Design;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Share link issuance response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareLinkResponse {
    /// Opaque share token; the client composes the public URL from it.
    pub token: String,
    /// When the link stops working.
    pub expires_at: DateTime<Utc>,
}

/// Design snapshot served to anonymous token holders.
///
/// Deliberately omits `owner_id`; a link conveys the design, not who
/// owns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharedDesignResponse {
    /// Design ID.
    pub id: Uuid,
    /// Source image URL.
    pub image_url: String,
    /// Width in centimeters.
    pub width: Option<f64>,
    /// Height in centimeters.
    pub height: Option<f64>,
    /// Depth in centimeters.
    pub depth: Option<f64>,
    /// Material name.
    pub material: Option<String>,
    /// Color name.
    pub color: Option<String>,
    /// When the design was created.
    pub created_at: DateTime<Utc>,
}

impl From<Design> for SharedDesignResponse {
    fn from(design: Design) -> Self {
        Self {
            id: design.id,
            image_url: design.image_url,
            width: design.width,
            height: design.height,
            depth: design.depth,
            material: design.material,
            color: design.color,
            created_at: design.created_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service name.
    pub service: String,
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
}

/// Readiness check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyResponse {
    /// Status.
    pub status: String,
    /// Database connectivity.
    pub database: String,
}
