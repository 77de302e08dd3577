//! Paginated recommendation feed with prefetch and action-driven
//! consumption.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use shortlist_types::{
    Error, FeedAction, FeedParams, RecommendationItem, RecommendationSource, Result,
};

use crate::config::FeedConfig;

/// State owned by the feed.
///
/// Invariant: `0 <= current_index <= items.len()`, and `current_index`
/// only moves by batch replacement (reset to 0) or by clamped advance.
#[derive(Debug, Default)]
struct FeedState {
    items: Vec<RecommendationItem>,
    current_index: usize,
    loading: bool,
    error: Option<Error>,
    last_params: Option<FeedParams>,
    /// Bumped on every outgoing fetch; a completion whose generation is
    /// no longer current discards its result.
    generation: u64,
}

impl FeedState {
    fn clamp_index(&mut self) {
        if self.items.is_empty() {
            self.current_index = 0;
        } else {
            self.current_index = self.current_index.min(self.items.len() - 1);
        }
    }

    fn needs_refill(&self, config: &FeedConfig) -> bool {
        !self.loading
            && self.last_params.is_some()
            && self.items.len() < config.max_buffered
            && self.current_index + config.lookahead >= self.items.len()
    }
}

/// Ordered, mutable sequence of not-yet-consumed recommendations.
///
/// Items arrive in already-ranked batches from a [`RecommendationSource`];
/// a new batch always REPLACES the current sequence. Consuming the current
/// item (like/dislike/add) removes it permanently, and the feed refills
/// itself with the last-used parameters once the cursor nears the end.
///
/// Handles are cheap to clone and share one underlying state.
#[derive(Clone)]
pub struct RecommendationFeed {
    inner: Arc<RwLock<FeedState>>,
    source: Arc<dyn RecommendationSource>,
    config: FeedConfig,
}

/// Point-in-time copy of the feed state, for rendering.
#[derive(Debug, Clone)]
pub struct FeedSnapshot {
    /// Remaining items, in order.
    pub items: Vec<RecommendationItem>,
    /// Cursor position within `items`.
    pub current_index: usize,
    /// Whether a fetch is in flight.
    pub loading: bool,
    /// Most recent fetch/submit failure, if any.
    pub error: Option<Error>,
}

impl RecommendationFeed {
    /// Create a feed over the given source with default configuration.
    pub fn new(source: Arc<dyn RecommendationSource>) -> Self {
        Self::with_config(source, FeedConfig::default())
    }

    /// Create a feed with explicit configuration.
    pub fn with_config(source: Arc<dyn RecommendationSource>, config: FeedConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(FeedState::default())),
            source,
            config,
        }
    }

    /// Fetch a fresh batch and replace the whole item sequence.
    ///
    /// Resets the cursor to 0 and records `params` for automatic refills.
    /// Overlapping calls resolve by generation: only the most recent
    /// request's result is ever applied.
    pub async fn refresh(&self, params: FeedParams) -> Result<()> {
        let generation = {
            let mut state = self.inner.write();
            state.generation += 1;
            state.loading = true;
            state.last_params = Some(params.clone());
            state.generation
        };

        debug!(generation, ?params, "fetching recommendation batch");
        let result = self.source.fetch_recommendations(&params).await;

        let mut state = self.inner.write();
        if state.generation != generation {
            trace!(
                generation,
                current = state.generation,
                "discarding stale batch"
            );
            return Ok(());
        }
        state.loading = false;

        match result {
            Ok(items) => {
                debug!(count = items.len(), "feed replaced");
                state.items = items;
                state.current_index = 0;
                state.error = None;
                Ok(())
            }
            Err(err) => {
                state.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Submit an action for the item under the cursor, then remove it.
    ///
    /// Returns `Error::State` without touching the network when the feed
    /// has no current item. On submit failure the item is retained and the
    /// error recorded; there is no optimistic removal.
    pub async fn consume_current(&self, action: FeedAction) -> Result<()> {
        let item = self
            .current_item()
            .ok_or_else(|| Error::State("no recommendation to act on".to_string()))?;

        debug!(external_id = %item.external_id, ?action, "submitting item action");
        match self.source.submit_action(&item, action).await {
            Ok(()) => {
                {
                    let mut state = self.inner.write();
                    // The batch may have been replaced while the action was
                    // in flight; match the consumed item by id.
                    if let Some(pos) = state
                        .items
                        .iter()
                        .position(|i| i.external_id == item.external_id)
                    {
                        state.items.remove(pos);
                    }
                    state.clamp_index();
                    state.error = None;
                }
                self.maybe_refill();
                Ok(())
            }
            Err(err) => {
                warn!(external_id = %item.external_id, error = %err, "item action failed");
                self.inner.write().error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Move the cursor forward by one without consuming, clamped to the
    /// last item.
    pub fn advance(&self) {
        {
            let mut state = self.inner.write();
            if !state.items.is_empty() {
                state.current_index = (state.current_index + 1).min(state.items.len() - 1);
            }
        }
        self.maybe_refill();
    }

    /// Re-evaluate the prefetch trigger and refill in the background if it
    /// holds.
    ///
    /// The `loading` flag is the in-flight guard: the trigger is checked on
    /// every state change but a refill never stacks on a running fetch. The
    /// flag is claimed before the task is spawned so two triggers cannot
    /// both pass the check. Refill failures land in the error state; the
    /// caller's own operation already succeeded.
    ///
    /// Requires a tokio runtime, as does everything else that touches the
    /// network.
    fn maybe_refill(&self) {
        let params = {
            let mut state = self.inner.write();
            if !state.needs_refill(&self.config) {
                return;
            }
            let Some(params) = state.last_params.clone() else {
                return;
            };
            state.loading = true;
            params
        };

        debug!("lookahead window reached, refilling feed");
        let feed = self.clone();
        tokio::spawn(async move {
            if let Err(err) = feed.refresh(params).await {
                warn!(error = %err, "automatic feed refill failed");
            }
        });
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    /// The item under the cursor, if any.
    pub fn current_item(&self) -> Option<RecommendationItem> {
        let state = self.inner.read();
        state.items.get(state.current_index).cloned()
    }

    /// Whether items remain beyond the cursor.
    pub fn has_more(&self) -> bool {
        let state = self.inner.read();
        !state.items.is_empty() && state.current_index < state.items.len() - 1
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.read().loading
    }

    /// Most recent failure, if any.
    pub fn last_error(&self) -> Option<Error> {
        self.inner.read().error.clone()
    }

    /// Number of unconsumed items.
    pub fn len(&self) -> usize {
        self.inner.read().items.len()
    }

    /// Check if the feed holds no items.
    pub fn is_empty(&self) -> bool {
        self.inner.read().items.is_empty()
    }

    /// Cursor position.
    pub fn current_index(&self) -> usize {
        self.inner.read().current_index
    }

    /// Point-in-time copy of the full state.
    pub fn snapshot(&self) -> FeedSnapshot {
        let state = self.inner.read();
        FeedSnapshot {
            items: state.items.clone(),
            current_index: state.current_index,
            loading: state.loading,
            error: state.error.clone(),
        }
    }
}

impl std::fmt::Debug for RecommendationFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read();
        f.debug_struct("RecommendationFeed")
            .field("len", &state.items.len())
            .field("current_index", &state.current_index)
            .field("loading", &state.loading)
            .finish()
    }
}
