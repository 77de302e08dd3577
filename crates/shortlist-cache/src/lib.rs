//! Time-bounded cache for cacheable read paths.
//!
//! This crate provides a generic key→value store where every entry carries
//! its own time-to-live:
//! - expired entries are treated as misses and evicted lazily on access
//! - a whole namespace of keys can be invalidated by prefix
//! - an optional periodic cleanup task bounds memory growth between accesses
//!
//! The cache is best-effort: a miss (including expiry) falls through to the
//! real data source, so it is never the sole holder of any data.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use shortlist_cache::{CacheConfig, CacheKey, TtlCache};
//!
//! let cache: TtlCache<String> =
//!     TtlCache::new(CacheConfig::new().with_default_ttl(Duration::from_secs(60)));
//!
//! let key = CacheKey::new("suggestions").param("q", "dune").build();
//! cache.insert(&key, "results".to_string());
//! assert_eq!(cache.get(&key), Some("results".to_string()));
//! ```

mod cache;
mod config;
mod key;

pub use cache::TtlCache;
pub use config::{CacheConfig, DEFAULT_CLEANUP_INTERVAL, DEFAULT_TTL};
pub use key::CacheKey;
