//! Behavior tests for the recommendation feed over a scripted source.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use shortlist_engine::{FeedConfig, RecommendationFeed};
use shortlist_types::{
    Error, FeedAction, FeedParams, RecommendationItem, RecommendationSource, Result,
};

/// One scripted batch; `gate` makes the fetch block until notified.
struct Batch {
    result: Result<Vec<RecommendationItem>>,
    gate: Option<Arc<Notify>>,
}

/// Scripted recommendation source.
///
/// Batches are served in push order; an unscripted fetch returns an empty
/// batch. Action results default to success.
struct MockSource {
    batches: Mutex<VecDeque<Batch>>,
    action_results: Mutex<VecDeque<Result<()>>>,
    fetch_calls: AtomicUsize,
    actions: Mutex<Vec<(String, FeedAction)>>,
}

impl MockSource {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            batches: Mutex::new(VecDeque::new()),
            action_results: Mutex::new(VecDeque::new()),
            fetch_calls: AtomicUsize::new(0),
            actions: Mutex::new(Vec::new()),
        })
    }

    fn push_batch(&self, items: Vec<RecommendationItem>) {
        self.batches.lock().unwrap().push_back(Batch {
            result: Ok(items),
            gate: None,
        });
    }

    fn push_gated_batch(&self, items: Vec<RecommendationItem>) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.batches.lock().unwrap().push_back(Batch {
            result: Ok(items),
            gate: Some(Arc::clone(&gate)),
        });
        gate
    }

    fn push_action_result(&self, result: Result<()>) {
        self.action_results.lock().unwrap().push_back(result);
    }

    fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    fn recorded_actions(&self) -> Vec<(String, FeedAction)> {
        self.actions.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecommendationSource for MockSource {
    async fn fetch_recommendations(
        &self,
        _params: &FeedParams,
    ) -> Result<Vec<RecommendationItem>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let batch = self.batches.lock().unwrap().pop_front();
        match batch {
            Some(batch) => {
                if let Some(gate) = batch.gate {
                    gate.notified().await;
                }
                batch.result
            }
            None => Ok(Vec::new()),
        }
    }

    async fn submit_action(&self, item: &RecommendationItem, action: FeedAction) -> Result<()> {
        self.actions
            .lock()
            .unwrap()
            .push((item.external_id.clone(), action));
        self.action_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()))
    }
}

fn item(id: &str) -> RecommendationItem {
    RecommendationItem {
        external_id: id.to_string(),
        title: id.to_uppercase(),
        content_type: "movie".to_string(),
        source: "catalog".to_string(),
        poster_url: None,
        description: None,
        compatibility_score: 0.7,
    }
}

fn items(ids: &[&str]) -> Vec<RecommendationItem> {
    ids.iter().map(|id| item(id)).collect()
}

/// Feed with prefetch disabled, for tests about consume/advance alone.
fn feed_without_refill(source: Arc<MockSource>) -> RecommendationFeed {
    RecommendationFeed::with_config(source, FeedConfig::new().with_max_buffered(0))
}

#[tokio::test]
async fn test_refresh_replaces_and_resets_cursor() {
    let source = MockSource::new();
    source.push_batch(items(&["a", "b", "c"]));
    let feed = feed_without_refill(Arc::clone(&source));

    feed.refresh(FeedParams::new()).await.unwrap();

    assert_eq!(feed.len(), 3);
    assert_eq!(feed.current_index(), 0);
    assert!(feed.has_more());
    assert_eq!(feed.current_item().unwrap().external_id, "a");
    assert_eq!(source.fetch_calls(), 1);
}

#[tokio::test]
async fn test_single_item_feed_has_no_more() {
    let source = MockSource::new();
    source.push_batch(items(&["only"]));
    let feed = feed_without_refill(Arc::clone(&source));

    feed.refresh(FeedParams::new()).await.unwrap();

    assert!(!feed.has_more());
    assert!(feed.current_item().is_some());
}

#[tokio::test]
async fn test_refresh_failure_records_error() {
    let source = MockSource::new();
    source.batches.lock().unwrap().push_back(Batch {
        result: Err(Error::Server {
            status: 500,
            message: "boom".to_string(),
        }),
        gate: None,
    });
    let feed = feed_without_refill(Arc::clone(&source));

    let err = feed.refresh(FeedParams::new()).await.unwrap_err();

    assert!(err.is_server_error());
    assert_eq!(feed.last_error(), Some(err));
    assert!(feed.is_empty());
    assert!(!feed.is_loading());
}

#[tokio::test]
async fn test_consume_removes_current_and_clamps() {
    let source = MockSource::new();
    source.push_batch(items(&["a", "b", "c", "d", "e"]));
    let feed = feed_without_refill(Arc::clone(&source));
    feed.refresh(FeedParams::new()).await.unwrap();

    feed.consume_current(FeedAction::Like).await.unwrap();

    assert_eq!(feed.len(), 4);
    assert_eq!(feed.current_index(), 0);
    assert_eq!(feed.current_item().unwrap().external_id, "b");
    assert_eq!(
        source.recorded_actions(),
        vec![("a".to_string(), FeedAction::Like)]
    );
}

#[tokio::test]
async fn test_consume_at_end_clamps_to_new_last_item() {
    let source = MockSource::new();
    source.push_batch(items(&["a", "b", "c"]));
    let feed = feed_without_refill(Arc::clone(&source));
    feed.refresh(FeedParams::new()).await.unwrap();

    feed.advance();
    feed.advance();
    assert_eq!(feed.current_index(), 2);

    feed.consume_current(FeedAction::Add).await.unwrap();

    // min(old index, new length - 1)
    assert_eq!(feed.len(), 2);
    assert_eq!(feed.current_index(), 1);
    assert_eq!(feed.current_item().unwrap().external_id, "b");
}

#[tokio::test]
async fn test_consume_last_item_leaves_empty_feed() {
    let source = MockSource::new();
    source.push_batch(items(&["only"]));
    let feed = feed_without_refill(Arc::clone(&source));
    feed.refresh(FeedParams::new()).await.unwrap();

    feed.consume_current(FeedAction::Dislike).await.unwrap();

    assert!(feed.is_empty());
    assert_eq!(feed.current_index(), 0);
    assert!(feed.current_item().is_none());
}

#[tokio::test]
async fn test_consume_failure_retains_item() {
    let source = MockSource::new();
    source.push_batch(items(&["a", "b"]));
    source.push_action_result(Err(Error::Network("connection reset".to_string())));
    let feed = feed_without_refill(Arc::clone(&source));
    feed.refresh(FeedParams::new()).await.unwrap();

    let err = feed.consume_current(FeedAction::Like).await.unwrap_err();

    // No optimistic removal: the item is still there for an explicit retry.
    assert_eq!(err, Error::Network("connection reset".to_string()));
    assert_eq!(feed.len(), 2);
    assert_eq!(feed.current_item().unwrap().external_id, "a");
    assert_eq!(feed.last_error(), Some(err));
}

#[tokio::test]
async fn test_consume_on_empty_feed_is_state_error_without_network() {
    let source = MockSource::new();
    let feed = feed_without_refill(Arc::clone(&source));

    let err = feed.consume_current(FeedAction::Like).await.unwrap_err();

    assert!(matches!(err, Error::State(_)));
    assert_eq!(source.fetch_calls(), 0);
    assert!(source.recorded_actions().is_empty());
}

#[tokio::test]
async fn test_advance_clamps_at_last_item() {
    let source = MockSource::new();
    source.push_batch(items(&["a", "b"]));
    let feed = feed_without_refill(Arc::clone(&source));
    feed.refresh(FeedParams::new()).await.unwrap();

    feed.advance();
    feed.advance();
    feed.advance();

    assert_eq!(feed.current_index(), 1);
    assert!(!feed.has_more());
}

#[tokio::test]
async fn test_prefetch_fires_exactly_once() {
    let source = MockSource::new();
    source.push_batch(items(&["a", "b", "c"]));
    let gate = source.push_gated_batch(items(&["d", "e", "f"]));
    let source_dyn: Arc<dyn RecommendationSource> = source.clone();
    let feed = RecommendationFeed::new(source_dyn);

    feed.refresh(FeedParams::new().with_category("movies"))
        .await
        .unwrap();
    assert_eq!(source.fetch_calls(), 1);

    // Index 1 of 3 is inside the lookahead window: refill starts.
    feed.advance();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(source.fetch_calls(), 2);
    assert!(feed.is_loading());

    // Further state changes while the refill is in flight must not stack
    // another fetch.
    feed.advance();
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(source.fetch_calls(), 2);

    gate.notify_one();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // The refill replaced the batch with the same parameters.
    assert_eq!(feed.len(), 3);
    assert_eq!(feed.current_index(), 0);
    assert_eq!(feed.current_item().unwrap().external_id, "d");
    assert!(!feed.is_loading());
    assert_eq!(source.fetch_calls(), 2);
}

#[tokio::test]
async fn test_no_prefetch_with_enough_lookahead() {
    let source = MockSource::new();
    source.push_batch(items(&["a", "b", "c", "d", "e"]));
    let source_dyn: Arc<dyn RecommendationSource> = source.clone();
    let feed = RecommendationFeed::new(source_dyn);
    feed.refresh(FeedParams::new()).await.unwrap();

    feed.advance();
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Index 1 of 5 still has more than one item of lookahead.
    assert_eq!(source.fetch_calls(), 1);
}

#[tokio::test]
async fn test_no_prefetch_past_buffer_bound() {
    let source = MockSource::new();
    source.push_batch(items(&["a", "b", "c"]));
    let source_dyn: Arc<dyn RecommendationSource> = source.clone();
    let feed = RecommendationFeed::with_config(
        source_dyn,
        FeedConfig::new().with_max_buffered(3),
    );
    feed.refresh(FeedParams::new()).await.unwrap();

    feed.advance();
    feed.advance();
    tokio::time::sleep(Duration::from_millis(10)).await;

    assert_eq!(source.fetch_calls(), 1);
}

#[tokio::test]
async fn test_latest_refresh_wins_over_stale_completion() {
    let source = MockSource::new();
    let gate = source.push_gated_batch(items(&["old-1", "old-2"]));
    source.push_batch(items(&["new-1", "new-2", "new-3"]));
    let feed = feed_without_refill(Arc::clone(&source));

    // First refresh blocks inside the source.
    let slow = {
        let feed = feed.clone();
        tokio::spawn(async move { feed.refresh(FeedParams::new()).await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    // Second refresh completes while the first is still in flight.
    feed.refresh(FeedParams::new().with_category("books"))
        .await
        .unwrap();
    assert_eq!(feed.current_item().unwrap().external_id, "new-1");

    // Let the stale completion land: it must be discarded.
    gate.notify_one();
    slow.await.unwrap().unwrap();

    assert_eq!(feed.len(), 3);
    assert_eq!(feed.current_item().unwrap().external_id, "new-1");
    assert!(!feed.is_loading());
}
