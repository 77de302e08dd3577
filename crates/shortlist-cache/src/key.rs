//! Deterministic cache keys.
//!
//! Keys are composed from an operation kind plus normalized parameter
//! values, so equivalent logical queries (same search text, category,
//! limit) always collapse into a single cache slot. The operation kind
//! doubles as a namespace prefix that
//! [`invalidate_prefix`](crate::TtlCache::invalidate_prefix) can target.

use std::fmt::Display;

/// Separator between key segments.
const SEPARATOR: char = ':';

/// Builder for deterministic cache keys.
///
/// # Example
///
/// ```rust
/// use shortlist_cache::CacheKey;
///
/// let key = CacheKey::new("suggestions")
///     .param("q", "  Dune  ")
///     .param("limit", 10)
///     .build();
/// assert_eq!(key, "suggestions:q=dune:limit=10");
/// assert!(key.starts_with(&CacheKey::namespace("suggestions")));
/// ```
#[derive(Debug, Clone)]
pub struct CacheKey {
    parts: Vec<String>,
}

impl CacheKey {
    /// Start a key for the given operation kind.
    pub fn new(operation: &str) -> Self {
        Self {
            parts: vec![normalize(operation)],
        }
    }

    /// Append a parameter. The value is normalized (trimmed, lowercased)
    /// so cosmetic differences in the query do not split the cache slot.
    pub fn param(mut self, name: &str, value: impl Display) -> Self {
        self.parts
            .push(format!("{}={}", name, normalize(&value.to_string())));
        self
    }

    /// Append a parameter only if a value is present.
    ///
    /// Absent parameters still contribute to determinism: two queries that
    /// differ only in whether the parameter was supplied produce distinct
    /// keys, since the segment is simply missing from one of them.
    pub fn opt_param(self, name: &str, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.param(name, value),
            None => self,
        }
    }

    /// Produce the final key string.
    pub fn build(self) -> String {
        self.parts.join(&SEPARATOR.to_string())
    }

    /// The prefix shared by every key of the given operation kind.
    pub fn namespace(operation: &str) -> String {
        format!("{}{}", normalize(operation), SEPARATOR)
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
