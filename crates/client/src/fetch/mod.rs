//! HTTP favicon fetch pipeline.
//!
//! ### Safety gates
//! - Request timeout and max body bytes from configuration.
//! - Max redirects: 5.
//!
//! ### Degradation
//! Fetch failures are never fatal: the resolver translates them into the
//! transient, non-persisted caching path.

pub mod encode;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, header};

use ringsnap_core::Error;

/// Configuration for the favicon fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "ringsnap/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 1MB)
    pub max_bytes: usize,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "ringsnap/0.1".to_string(),
            max_bytes: 1024 * 1024,
            timeout: Duration::from_millis(10_000),
            max_redirects: 5,
        }
    }
}

/// A fetched image with enough metadata to embed it.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Response body bytes
    pub bytes: Bytes,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// Capability seam for fetching remote images, stubbed in tests.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedImage, Error>;
}

/// HTTP favicon fetch client.
pub struct FaviconFetcher {
    http: Client,
    config: FetchConfig,
}

impl FaviconFetcher {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

#[async_trait]
impl ImageFetcher for FaviconFetcher {
    /// Fetch an image URL, returning raw bytes and metadata.
    ///
    /// Respects the configured timeout, redirect, and byte limits.
    async fn fetch(&self, url: &str) -> Result<FetchedImage, Error> {
        let start = Instant::now();

        let response = self
            .http
            .get(url)
            .header("Accept", "image/avif,image/webp,image/png,image/*;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| Error::Http(format!("network error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("status {}", status.as_u16())));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes)));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Http(format!("failed to read response: {e}")))?;

        if bytes.len() > self.config.max_bytes {
            return Err(Error::FetchTooLarge(format!("{} bytes exceeds {}", bytes.len(), self.config.max_bytes)));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} in {}ms ({} bytes)", url, fetch_ms, bytes.len());

        Ok(FetchedImage { bytes, content_type, fetch_ms })
    }
}
