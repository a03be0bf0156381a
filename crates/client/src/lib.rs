//! Client code for ringsnap.
//!
//! This crate provides the HTTP favicon fetch pipeline, embedded payload
//! encoding, and the icon resolver that feeds the two-tier cache.

pub mod fetch;
pub mod icon;

pub use fetch::{FaviconFetcher, FetchConfig, FetchedImage, ImageFetcher};
pub use icon::{FaviconSource, IconResolver, IconState, IconStates};
