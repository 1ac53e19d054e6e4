//! Design entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A customizable design owned by a platform user.
///
/// The record store owns the full lifecycle of this row; the sharing and
/// export subsystem only ever reads it as an immutable snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Design {
    /// Unique design identifier.
    pub id: Uuid,
    /// User who owns the design.
    pub owner_id: Uuid,
    /// Fetchable URL of the uploaded source image.
    pub image_url: String,
    /// Width in centimeters, if specified.
    pub width: Option<f64>,
    /// Height in centimeters, if specified.
    pub height: Option<f64>,
    /// Depth in centimeters, if specified.
    pub depth: Option<f64>,
    /// Material description, free text.
    pub material: Option<String>,
    /// Color description, free text.
    pub color: Option<String>,
    /// When the design was created.
    pub created_at: DateTime<Utc>,
}
