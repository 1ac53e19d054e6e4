//! Tech-pack rendering configuration.

use serde::{Deserialize, Serialize};

/// Settings for the export renderer's image fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Total timeout for fetching the design image, in seconds.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_seconds: u64,
    /// Maximum accepted image size in bytes. Larger responses are treated
    /// like a failed fetch and the document falls back to a notice.
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_seconds: default_fetch_timeout(),
            max_image_bytes: default_max_image_bytes(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    10
}

/// 20 MiB.
fn default_max_image_bytes() -> u64 {
    20 * 1024 * 1024
}
