//! Share grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// The capability grant that makes a design reachable by token.
///
/// A design has at most one grant row; rotation overwrites the row in
/// place and bumps `generation`, so a replaced token simply stops
/// resolving. Rows are never deleted: expiry is evaluated at read time
/// against `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShareGrant {
    /// The design this grant gives access to. Primary key: at most one
    /// grant per design.
    pub design_id: Uuid,
    /// Bearer token. Unique across all grants; presenting it grants read
    /// access to the design with no further authentication.
    #[serde(skip_serializing)]
    pub token: String,
    /// Rotation counter, starts at 1 and increments each time the token
    /// is replaced.
    pub generation: i64,
    /// When the current token was minted.
    pub issued_at: DateTime<Utc>,
    /// When the current token stops resolving.
    pub expires_at: DateTime<Utc>,
}

impl ShareGrant {
    /// Check whether the grant is live at the given instant.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}
