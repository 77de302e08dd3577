//! Backend traits the state machines run against.
//!
//! `shortlist-engine` only ever talks to these traits; `shortlist-client`
//! implements them over HTTP. Tests substitute scripted in-memory backends.

use async_trait::async_trait;

use crate::error::Result;
use crate::model::{
    Choice, ChoiceOutcome, FeedAction, FeedParams, RecommendationItem, Session, SessionSnapshot,
};

/// Source of recommendation batches and sink for item actions.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Fetch one already-ranked batch of recommendations.
    async fn fetch_recommendations(&self, params: &FeedParams)
        -> Result<Vec<RecommendationItem>>;

    /// Record the user's action on an item.
    async fn submit_action(&self, item: &RecommendationItem, action: FeedAction) -> Result<()>;
}

/// Backend for versus match sessions.
#[async_trait]
pub trait VersusBackend: Send + Sync {
    /// Create a new session with the requested round count.
    ///
    /// The response carries no round; callers follow up with
    /// [`fetch_session`](Self::fetch_session) to obtain round 1.
    async fn create_session(&self, total_rounds: u32) -> Result<Session>;

    /// Fetch the current session and its pending round, if any.
    async fn fetch_session(&self) -> Result<SessionSnapshot>;

    /// Submit the choice for one round.
    async fn submit_choice(&self, round_id: &str, choice: Choice) -> Result<ChoiceOutcome>;
}
