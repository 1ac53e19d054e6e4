//! Request DTOs.

use serde::{Deserialize, Serialize};

/// Query parameters for share link issuance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareLinkQuery {
    /// Pass `rotate=1` to replace any existing grant with a fresh token.
    /// Any other value, or absence, keeps the live grant.
    pub rotate: Option<String>,
    /// Requested link lifetime in minutes. Falls back to the configured
    /// default and is clamped to the configured maximum.
    pub ttl_minutes: Option<i64>,
}

impl ShareLinkQuery {
    /// Whether the caller asked for rotation.
    pub fn wants_rotation(&self) -> bool {
        self.rotate.as_deref() == Some("1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_literal_one_rotates() {
        let on = ShareLinkQuery {
            rotate: Some("1".to_string()),
            ttl_minutes: None,
        };
        assert!(on.wants_rotation());

        let off = ShareLinkQuery {
            rotate: Some("true".to_string()),
            ttl_minutes: None,
        };
        assert!(!off.wants_rotation());
        assert!(!ShareLinkQuery::default().wants_rotation());
    }
}
