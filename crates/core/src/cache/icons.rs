//! Durable icon rows (tier 2).
//!
//! CRUD operations for persisted icon entries. Freshness is not evaluated
//! here: rows are returned with their timestamps and the two-tier store
//! decides expiry, so corrupt timestamps can be treated as expired rather
//! than as read errors.

use chrono::{DateTime, Duration, Utc};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::key::IconKey;
use crate::Error;

/// A persisted icon cache row.
#[derive(Debug, Clone)]
pub struct IconRow {
    /// Embedded image payload (`data:` URI), or a raw URL when conversion
    /// was skipped.
    pub data: String,

    /// RFC 3339 write timestamp.
    pub cached_at: String,
}

impl CacheDb {
    /// Get the icon row for a key.
    ///
    /// Returns None if the key doesn't exist in the cache.
    pub async fn get_icon(&self, key: &IconKey) -> Result<Option<IconRow>, Error> {
        let domain = key.domain.clone();
        let source_index = key.source_index;
        self.conn
            .call(move |conn| -> Result<Option<IconRow>, Error> {
                let mut stmt =
                    conn.prepare("SELECT data, cached_at FROM icons WHERE domain = ?1 AND source_index = ?2")?;

                let result = stmt.query_row(params![domain, source_index], |row| {
                    Ok(IconRow { data: row.get(0)?, cached_at: row.get(1)? })
                });

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or update an icon row with a fresh timestamp.
    ///
    /// Uses UPSERT semantics: inserts if the key doesn't exist, updates the
    /// payload and timestamp if it does.
    pub async fn put_icon(&self, key: &IconKey, data: &str) -> Result<(), Error> {
        self.put_icon_at(key, data, &Utc::now().to_rfc3339()).await
    }

    /// Insert or update an icon row with an explicit timestamp.
    pub(crate) async fn put_icon_at(&self, key: &IconKey, data: &str, cached_at: &str) -> Result<(), Error> {
        let domain = key.domain.clone();
        let source_index = key.source_index;
        let data = data.to_string();
        let cached_at = cached_at.to_string();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO icons (domain, source_index, data, cached_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(domain, source_index) DO UPDATE SET
                        data = excluded.data,
                        cached_at = excluded.cached_at",
                    params![domain, source_index, data, cached_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete the icon row for a key.
    pub async fn delete_icon(&self, key: &IconKey) -> Result<(), Error> {
        let domain = key.domain.clone();
        let source_index = key.source_index;
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "DELETE FROM icons WHERE domain = ?1 AND source_index = ?2",
                    params![domain, source_index],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete icon rows older than the TTL, plus rows whose timestamp fails
    /// to parse (corrupt entries are treated as expired).
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired_icons(&self, ttl: Duration) -> Result<u64, Error> {
        let now = Utc::now();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let mut stmt = conn.prepare("SELECT domain, source_index, cached_at FROM icons")?;
                let rows = stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?, row.get::<_, String>(2)?))
                })?;

                let mut stale = Vec::new();
                for row in rows {
                    let (domain, source_index, cached_at) = row?;
                    let expired = match DateTime::parse_from_rfc3339(&cached_at) {
                        Ok(t) => now.signed_duration_since(t.with_timezone(&Utc)) > ttl,
                        Err(_) => true,
                    };
                    if expired {
                        stale.push((domain, source_index));
                    }
                }
                drop(stmt);

                let mut deleted = 0u64;
                for (domain, source_index) in stale {
                    deleted += conn.execute(
                        "DELETE FROM icons WHERE domain = ?1 AND source_index = ?2",
                        params![domain, source_index],
                    )? as u64;
                }
                Ok(deleted)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete every icon row for a domain, across all source indices.
    ///
    /// Matches the domain column exactly, so other domains are untouched even
    /// when one name is a substring of another.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_icons_by_domain(&self, domain: &str) -> Result<u64, Error> {
        let domain = domain.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM icons WHERE domain = ?1", params![domain])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_and_get() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let key = IconKey::new("example.com", 0);

        db.put_icon(&key, "data:image/png;base64,AAAA").await.unwrap();

        let row = db.get_icon(&key).await.unwrap().unwrap();
        assert_eq!(row.data, "data:image/png;base64,AAAA");
        assert!(DateTime::parse_from_rfc3339(&row.cached_at).is_ok());
    }

    #[tokio::test]
    async fn test_get_missing() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let result = db.get_icon(&IconKey::new("nowhere.com", 0)).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_payload() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let key = IconKey::new("example.com", 1);

        db.put_icon(&key, "old").await.unwrap();
        db.put_icon(&key, "new").await.unwrap();

        let row = db.get_icon(&key).await.unwrap().unwrap();
        assert_eq!(row.data, "new");
    }

    #[tokio::test]
    async fn test_delete() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let key = IconKey::new("example.com", 0);

        db.put_icon(&key, "payload").await.unwrap();
        db.delete_icon(&key).await.unwrap();

        assert!(db.get_icon(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_purge_expired_removes_old_and_corrupt() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let old = (Utc::now() - Duration::days(8)).to_rfc3339();

        db.put_icon_at(&IconKey::new("old.com", 0), "stale", &old).await.unwrap();
        db.put_icon_at(&IconKey::new("bad.com", 0), "corrupt", "not a timestamp")
            .await
            .unwrap();
        db.put_icon(&IconKey::new("fresh.com", 0), "fresh").await.unwrap();

        let deleted = db.purge_expired_icons(Duration::days(7)).await.unwrap();
        assert_eq!(deleted, 2);

        assert!(db.get_icon(&IconKey::new("old.com", 0)).await.unwrap().is_none());
        assert!(db.get_icon(&IconKey::new("bad.com", 0)).await.unwrap().is_none());
        assert!(db.get_icon(&IconKey::new("fresh.com", 0)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_purge_by_domain_is_exact() {
        let db = CacheDb::open_in_memory().await.unwrap();

        db.put_icon(&IconKey::new("a.com", 0), "x").await.unwrap();
        db.put_icon(&IconKey::new("a.com", 1), "y").await.unwrap();
        db.put_icon(&IconKey::new("xa.com", 0), "z").await.unwrap();

        let deleted = db.purge_icons_by_domain("a.com").await.unwrap();
        assert_eq!(deleted, 2);

        assert!(db.get_icon(&IconKey::new("a.com", 0)).await.unwrap().is_none());
        assert!(db.get_icon(&IconKey::new("a.com", 1)).await.unwrap().is_none());
        assert!(db.get_icon(&IconKey::new("xa.com", 0)).await.unwrap().is_some());
    }
}
