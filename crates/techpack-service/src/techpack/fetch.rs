//! Design image retrieval over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use techpack_core::config::render::RenderConfig;
use techpack_core::error::ErrorKind;
use techpack_core::{AppError, AppResult};

/// An image downloaded from the design's source URL.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Content type as reported by the host, possibly empty.
    pub content_type: String,
    /// Raw image bytes.
    pub bytes: Bytes,
}

/// Trait for fetching design images.
#[async_trait]
pub trait ImageFetcher: Send + Sync + std::fmt::Debug {
    /// Downloads the image at `url`.
    async fn fetch(&self, url: &str) -> AppResult<FetchedImage>;
}

/// HTTP image fetcher with a request timeout and a size ceiling.
#[derive(Debug, Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
    max_bytes: u64,
}

impl HttpImageFetcher {
    /// Creates a fetcher from the render configuration.
    pub fn new(config: &RenderConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            max_bytes: config.max_image_bytes,
        })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> AppResult<FetchedImage> {
        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to reach image host", e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Image host answered {status}"
            )));
        }

        if let Some(length) = response.content_length() {
            if length > self.max_bytes {
                return Err(AppError::external_service(format!(
                    "Image is {length} bytes, over the {} byte limit",
                    self.max_bytes
                )));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = response.bytes().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Failed to read image body", e)
        })?;

        if bytes.len() as u64 > self.max_bytes {
            return Err(AppError::external_service(format!(
                "Image is {} bytes, over the {} byte limit",
                bytes.len(),
                self.max_bytes
            )));
        }

        Ok(FetchedImage {
            content_type,
            bytes,
        })
    }
}
