//! Two-tier icon cache facade.
//!
//! Tier 1 is an in-process map of plain strings keyed by [`IconKey`]; tier 2
//! is the durable `icons` table. A `put` followed by a `get` in the same
//! process always observes the written value (tier 1 is authoritative while
//! present); tier 2 is the source of truth across restarts.
//!
//! The cache is an explicitly constructed value injected into its consumers,
//! never ambient state, so tests get isolated instances.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use super::connection::CacheDb;
use super::key::IconKey;

/// Cached icon entries expire after this many days.
pub const CACHE_TTL_DAYS: i64 = 7;

/// Two-tier icon cache.
pub struct IconCache {
    memory: HashMap<IconKey, String>,
    db: CacheDb,
    ttl: Duration,
}

impl IconCache {
    /// Build a cache over an opened database and run the startup sweep of
    /// expired durable entries.
    pub async fn new(db: CacheDb) -> Self {
        let mut cache = Self { memory: HashMap::new(), db, ttl: Duration::days(CACHE_TTL_DAYS) };
        cache.evict_expired().await;
        cache
    }

    /// Look up a cached icon.
    ///
    /// Checks tier 1 first; on miss, a fresh tier-2 row is promoted into
    /// tier 1 and returned, an expired row is deleted, and a read failure
    /// degrades to a miss.
    pub async fn get(&mut self, domain: &str, source_index: u32) -> Option<String> {
        let key = IconKey::new(domain, source_index);

        if let Some(value) = self.memory.get(&key) {
            return Some(value.clone());
        }

        let row = match self.db.get_icon(&key).await {
            Ok(row) => row?,
            Err(e) => {
                warn!(key = %key, error = %e, "icon cache read failed");
                return None;
            }
        };

        if self.is_fresh(&row.cached_at) {
            self.memory.insert(key, row.data.clone());
            Some(row.data)
        } else {
            if let Err(e) = self.db.delete_icon(&key).await {
                warn!(key = %key, error = %e, "failed to delete expired icon entry");
            }
            None
        }
    }

    /// Cache an icon in both tiers.
    ///
    /// Tier 1 is written unconditionally. A tier-2 write failure is not
    /// raised: it triggers an opportunistic sweep of expired entries and the
    /// write is not retried.
    pub async fn put(&mut self, domain: &str, source_index: u32, value: &str) {
        let key = IconKey::new(domain, source_index);
        self.memory.insert(key.clone(), value.to_string());

        if let Err(e) = self.db.put_icon(&key, value).await {
            warn!(key = %key, error = %e, "icon cache write failed, sweeping expired entries");
            self.evict_expired().await;
        }
    }

    /// Cache an icon in tier 1 only.
    ///
    /// Used for payloads that must not survive a restart, such as raw URLs
    /// that failed conversion and may be inaccessible next time.
    pub fn put_transient(&mut self, domain: &str, source_index: u32, value: &str) {
        self.memory.insert(IconKey::new(domain, source_index), value.to_string());
    }

    /// Sweep expired and corrupt entries out of tier 2.
    ///
    /// Returns the number of deleted entries; failures are logged and count
    /// as zero.
    pub async fn evict_expired(&mut self) -> u64 {
        match self.db.purge_expired_icons(self.ttl).await {
            Ok(purged) => {
                if purged > 0 {
                    debug!(purged, "evicted expired icon entries");
                }
                purged
            }
            Err(e) => {
                warn!(error = %e, "icon cache sweep failed");
                0
            }
        }
    }

    /// Remove every entry for a domain from both tiers, across all source
    /// indices. Matches the key's domain field, so other domains are
    /// untouched even when one name is a substring of another.
    pub async fn clear_domain(&mut self, domain: &str) {
        self.memory.retain(|key, _| key.domain != domain);

        if let Err(e) = self.db.purge_icons_by_domain(domain).await {
            warn!(domain, error = %e, "failed to clear durable icon entries");
        }
    }

    fn is_fresh(&self, cached_at: &str) -> bool {
        match DateTime::parse_from_rfc3339(cached_at) {
            Ok(t) => Utc::now().signed_duration_since(t.with_timezone(&Utc)) <= self.ttl,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn cache() -> IconCache {
        IconCache::new(CacheDb::open_in_memory().await.unwrap()).await
    }

    #[tokio::test]
    async fn test_put_then_get_round_trip() {
        let mut cache = cache().await;
        cache.put("example.com", 0, "data:image/png;base64,AAAA").await;
        assert_eq!(cache.get("example.com", 0).await.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[tokio::test]
    async fn test_miss_on_unknown_key() {
        let mut cache = cache().await;
        assert!(cache.get("example.com", 0).await.is_none());
        cache.put("example.com", 0, "x").await;
        assert!(cache.get("example.com", 1).await.is_none());
    }

    #[tokio::test]
    async fn test_tier2_promotion() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let mut cache = IconCache::new(db.clone()).await;

        // Written behind the facade's back, as a previous process would have.
        db.put_icon(&IconKey::new("example.com", 0), "persisted").await.unwrap();

        assert_eq!(cache.get("example.com", 0).await.as_deref(), Some("persisted"));
        assert_eq!(cache.memory.get(&IconKey::new("example.com", 0)).map(String::as_str), Some("persisted"));
    }

    #[tokio::test]
    async fn test_expired_entry_treated_as_absent_and_deleted() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let mut cache = IconCache::new(db.clone()).await;

        let old = (Utc::now() - Duration::days(8)).to_rfc3339();
        db.put_icon_at(&IconKey::new("example.com", 0), "stale", &old).await.unwrap();

        assert!(cache.get("example.com", 0).await.is_none());
        assert!(db.get_icon(&IconKey::new("example.com", 0)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_timestamp_treated_as_expired() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let mut cache = IconCache::new(db.clone()).await;

        db.put_icon_at(&IconKey::new("example.com", 0), "corrupt", "garbage")
            .await
            .unwrap();

        assert!(cache.get("example.com", 0).await.is_none());
    }

    #[tokio::test]
    async fn test_put_transient_not_persisted() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let mut cache = IconCache::new(db.clone()).await;

        cache.put_transient("example.com", 2, "https://example.com/favicon.ico");

        assert_eq!(cache.get("example.com", 2).await.as_deref(), Some("https://example.com/favicon.ico"));
        assert!(db.get_icon(&IconKey::new("example.com", 2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_startup_sweep_purges_expired() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let old = (Utc::now() - Duration::days(30)).to_rfc3339();
        db.put_icon_at(&IconKey::new("old.com", 0), "stale", &old).await.unwrap();

        let _cache = IconCache::new(db.clone()).await;

        assert!(db.get_icon(&IconKey::new("old.com", 0)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_domain_spares_substring_domains() {
        let mut cache = cache().await;
        cache.put("a.com", 0, "one").await;
        cache.put("a.com", 1, "two").await;
        cache.put("xa.com", 0, "three").await;
        cache.put("a.com.evil.net", 0, "four").await;

        cache.clear_domain("a.com").await;

        assert!(cache.get("a.com", 0).await.is_none());
        assert!(cache.get("a.com", 1).await.is_none());
        assert_eq!(cache.get("xa.com", 0).await.as_deref(), Some("three"));
        assert_eq!(cache.get("a.com.evil.net", 0).await.as_deref(), Some("four"));
    }
}
