//! Local caching module for offline data access.
//!
//! This module provides the `CacheManager` for storing and retrieving
//! portal data locally. Data is cached in JSON format and considered
//! stale after 60 minutes.
//!
//! Cached data types include:
//! - Region (시/도) and district (군/구) lists
//! - The member's my page data
//! - Subscription detail pages

pub mod manager;

pub use manager::{CacheManager, CachedData};
