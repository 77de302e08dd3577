//! Configuration for the recommendation feed.

/// Default lookahead window: a refill triggers once at most one unconsumed
/// item remains ahead of the cursor.
pub const DEFAULT_LOOKAHEAD: usize = 2;

/// Default upper bound on buffered items; past this the feed stops
/// refilling no matter how close the cursor gets to the end.
pub const DEFAULT_MAX_BUFFERED: usize = 200;

/// Configuration for [`RecommendationFeed`](crate::RecommendationFeed).
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Refill once `current_index + lookahead >= items.len()`.
    pub lookahead: usize,

    /// Never refill while the feed already holds this many items.
    pub max_buffered: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
            max_buffered: DEFAULT_MAX_BUFFERED,
        }
    }
}

impl FeedConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the lookahead window.
    pub fn with_lookahead(mut self, lookahead: usize) -> Self {
        self.lookahead = lookahead;
        self
    }

    /// Set the buffered-items safety bound.
    pub fn with_max_buffered(mut self, max: usize) -> Self {
        self.max_buffered = max;
        self
    }
}
