//! Share-grant issuance configuration.

use serde::{Deserialize, Serialize};

/// Policy bounds for share-token lifetimes.
///
/// Callers may request a TTL per issuance; requests above `max_ttl_minutes`
/// are clamped, zero or negative requests are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareConfig {
    /// TTL applied when the caller does not supply one, in minutes.
    #[serde(default = "default_ttl")]
    pub default_ttl_minutes: i64,
    /// Upper bound on the caller-supplied TTL, in minutes.
    #[serde(default = "default_max_ttl")]
    pub max_ttl_minutes: i64,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            default_ttl_minutes: default_ttl(),
            max_ttl_minutes: default_max_ttl(),
        }
    }
}

/// Seven days.
fn default_ttl() -> i64 {
    10_080
}

/// Thirty days.
fn default_max_ttl() -> i64 {
    43_200
}
