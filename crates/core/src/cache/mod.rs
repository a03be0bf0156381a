//! Two-tier icon cache with a SQLite backing store.
//!
//! Tier 1 is a fast in-process map of plain strings; tier 2 is a durable
//! SQLite table accessed via tokio-rusqlite. Entries carry a timestamp in
//! tier 2 and expire after a fixed TTL. The cache degrades gracefully:
//! storage failures are logged and treated as misses, never raised.

pub mod connection;
pub mod icons;
pub mod key;
pub mod migrations;
pub mod store;

pub use crate::Error;

pub use connection::CacheDb;
pub use icons::IconRow;
pub use key::IconKey;
pub use store::{CACHE_TTL_DAYS, IconCache};
