//! Domain model for the recommendation feed and versus match sessions.
//!
//! These types mirror the catalog server's API contract after validation;
//! wire-level DTOs (and the raw→domain mapping) live in `shortlist-client`.

use serde::{Deserialize, Serialize};

/// A single recommendation held by the feed.
///
/// Items are exclusively owned by the feed's ordered sequence and removed
/// permanently once consumed. `external_id` is guaranteed non-empty: records
/// without one are rejected before they ever become a `RecommendationItem`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    /// Identifier of the item in its upstream catalog, unique within a feed.
    pub external_id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Kind of content (e.g. "movie", "series").
    #[serde(default)]
    pub content_type: String,
    /// Upstream catalog this item came from.
    #[serde(default)]
    pub source: String,
    /// Poster/cover image URL, if the catalog has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    /// Longer description, if the catalog has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// How well this item matches the user's taste profile.
    #[serde(default)]
    pub compatibility_score: f64,
}

/// Parameters for fetching a recommendation batch.
///
/// The feed stores the last-used parameters so automatic refills repeat the
/// same query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedParams {
    /// Restrict recommendations to one category, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Number of items to request per batch.
    pub count: u32,
}

impl FeedParams {
    /// Default batch size requested from the server.
    pub const DEFAULT_COUNT: u32 = 20;

    /// Create parameters for an uncategorized batch of the default size.
    pub fn new() -> Self {
        Self {
            category: None,
            count: Self::DEFAULT_COUNT,
        }
    }

    /// Restrict the batch to a category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the batch size.
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

impl Default for FeedParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Action taken on a feed item.
///
/// Every variant consumes the item: it is removed from the feed and cannot
/// be brought back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedAction {
    /// Mark the item as liked.
    Like,
    /// Mark the item as disliked.
    Dislike,
    /// Add the item to the user's list.
    Add,
}

/// Choice submitted for a versus round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Like,
    Dislike,
    Skip,
}

/// A versus match session as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Session ID.
    pub id: String,
    /// Number of the round currently being played (1-based).
    pub current_round_number: u32,
    /// Total rounds requested when the session was created.
    pub total_rounds: u32,
    /// Whether all rounds have been consumed.
    pub is_finished: bool,
    /// Running score.
    #[serde(default)]
    pub score: i64,
}

/// One round of a versus session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Round ID, used to address the choice endpoint.
    pub id: String,
    /// Position of this round within the session (1-based).
    pub round_number: u32,
    /// The content item presented for judgment.
    pub content: RecommendationItem,
    /// Whether a choice has already been recorded for this round.
    #[serde(default)]
    pub is_answered: bool,
}

/// Immutable summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Final score.
    pub total_score: i64,
    /// Rounds answered with [`Choice::Like`].
    pub likes: u32,
    /// Rounds answered with [`Choice::Dislike`].
    pub dislikes: u32,
    /// Rounds answered with [`Choice::Skip`].
    pub skips: u32,
}

/// Session state plus the round currently awaiting a choice.
///
/// This is what an idempotent session fetch returns; `current_round` is
/// absent once the session has finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session: Session,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_round: Option<Round>,
}

/// Result of submitting a round choice.
///
/// The next round is never returned inline; callers re-fetch the session to
/// obtain it. The summary is present only when the choice finished the
/// session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceOutcome {
    pub session: Session,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SessionSummary>,
}

/// A catalog suggestion from the cacheable search path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Identifier of the suggested item in its upstream catalog.
    pub external_id: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Kind of content.
    #[serde(default)]
    pub content_type: String,
    /// Poster/cover image URL, if available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}
