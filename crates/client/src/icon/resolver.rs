//! Icon resolution orchestration.
//!
//! Ties the two-tier cache to the favicon sources and the fetch pipeline.
//! Every failure degrades: a fetch or conversion error caches the raw source
//! URL in the memory tier only, so an inaccessible URL never survives a
//! restart, and the caller still gets something renderable back.

use tracing::warn;

use ringsnap_core::cache::IconCache;

use crate::fetch::{ImageFetcher, encode};
use crate::icon::sources::FaviconSource;

/// Resolves display icons for domains through the cache.
pub struct IconResolver<F> {
    cache: IconCache,
    fetcher: F,
    icon_size: u32,
}

impl<F: ImageFetcher> IconResolver<F> {
    /// Build a resolver over an explicitly constructed cache.
    pub fn new(cache: IconCache, fetcher: F, icon_size: u32) -> Self {
        Self { cache, fetcher, icon_size }
    }

    /// Resolve an icon for a (domain, source index) pair.
    ///
    /// The cached payload is returned when present; otherwise the source's
    /// URL is fetched, embedded, and cached in both tiers. On conversion
    /// failure the raw URL is cached in the memory tier and returned.
    /// `None` only for a source index past the end of the fallback list;
    /// the caller advances the index to implement "try the next source".
    pub async fn resolve(&mut self, domain: &str, source_index: u32) -> Option<String> {
        if let Some(cached) = self.cache.get(domain, source_index).await {
            return Some(cached);
        }

        let source = FaviconSource::for_index(source_index)?;
        let url = source.url_for(domain, self.icon_size);
        Some(self.fetch_and_cache(domain, source_index, &url).await)
    }

    /// Cache an icon from a known image URL or embedded payload.
    ///
    /// Payloads that are already embedded skip the fetch and persist
    /// directly; URLs go through the fetch/convert/degrade path.
    pub async fn cache_icon(&mut self, domain: &str, source_index: u32, image_url: &str) -> String {
        if encode::is_data_uri(image_url) {
            self.cache.put(domain, source_index, image_url).await;
            return image_url.to_string();
        }

        self.fetch_and_cache(domain, source_index, image_url).await
    }

    /// Pin a caller-chosen icon source for a domain.
    ///
    /// Same persistence contract as a successful resolve; used when the user
    /// manually selects a source.
    pub async fn update_preferred_icon(&mut self, domain: &str, source_index: u32, image_url: &str) -> String {
        self.cache_icon(domain, source_index, image_url).await
    }

    /// Remove every cached icon for a domain, across all source indices.
    pub async fn clear_domain(&mut self, domain: &str) {
        self.cache.clear_domain(domain).await;
    }

    async fn fetch_and_cache(&mut self, domain: &str, source_index: u32, url: &str) -> String {
        match self.fetcher.fetch(url).await {
            Ok(image) => {
                let payload = encode::to_data_uri(&image.bytes, image.content_type.as_deref());
                self.cache.put(domain, source_index, &payload).await;
                payload
            }
            Err(e) => {
                warn!(domain, source_index, error = %e, "favicon conversion failed, caching raw url");
                self.cache.put_transient(domain, source_index, url);
                url.to_string()
            }
        }
    }
}
