//! Tech pack export orchestration.

use std::sync::Arc;

use chrono::Utc;
use techpack_core::error::ErrorKind;
use techpack_core::{AppError, AppResult};
use techpack_entity::design::Design;
use tracing::{debug, warn};

use crate::techpack::fetch::ImageFetcher;
use crate::techpack::renderer::{render_techpack, ImageSource};

/// Service that turns a design into a finished tech pack PDF.
#[derive(Clone)]
pub struct TechPackService {
    fetcher: Arc<dyn ImageFetcher>,
}

impl std::fmt::Debug for TechPackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TechPackService").finish()
    }
}

impl TechPackService {
    /// Creates a new tech pack service.
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Produces the PDF bytes for a design.
    ///
    /// A failed image download degrades to a document with a fallback
    /// notice rather than failing the export. Rendering runs on the
    /// blocking pool since PDF assembly is CPU work.
    pub async fn export(&self, design: &Design) -> AppResult<Vec<u8>> {
        let image = match self.fetcher.fetch(&design.image_url).await {
            Ok(fetched) => ImageSource::Fetched {
                content_type: fetched.content_type,
                bytes: fetched.bytes,
            },
            Err(e) => {
                warn!(
                    design_id = %design.id,
                    error = %e,
                    "Image fetch failed, exporting with fallback notice"
                );
                ImageSource::Unavailable
            }
        };

        let design = design.clone();
        let generated_at = Utc::now();
        let bytes = tokio::task::spawn_blocking(move || {
            render_techpack(&design, &image, generated_at)
        })
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Render task panicked", e))??;

        debug!(size = bytes.len(), "Tech pack rendered");
        Ok(bytes)
    }
}
