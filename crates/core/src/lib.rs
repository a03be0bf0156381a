//! Core types and shared functionality for ringsnap.
//!
//! This crate provides:
//! - The rule matching engine (text normalization, regex rules, URL templates)
//! - The two-tier icon cache with SQLite backend
//! - Rule persistence
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod matcher;
pub mod rules;

pub use cache::{CacheDb, IconCache, IconKey};
pub use error::Error;
pub use rules::{MatchResult, Rule};
