//! Wire-level request and response types for the catalog API.
//!
//! These mirror the server's JSON contract. Raw records are mapped into
//! the domain types from `shortlist-types` with hard validation: a
//! recommendation without an identifier cannot be acted upon downstream,
//! so it fails the mapping instead of being coerced to a placeholder.

use serde::{Deserialize, Serialize};

use shortlist_types::{Choice, Error, FeedAction, RecommendationItem, Suggestion};

// ─────────────────────────────────────────────────────────────────────────
// Match
// ─────────────────────────────────────────────────────────────────────────

/// A recommendation record as the server sends it.
///
/// Everything is optional at the wire level; validation happens in the
/// conversion to [`RecommendationItem`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecommendation {
    /// Identifier in the upstream catalog.
    #[serde(default)]
    pub external_id: Option<String>,
    /// Some upstream sources send the identifier under `id` instead.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub compatibility_score: Option<f64>,
}

impl TryFrom<RawRecommendation> for RecommendationItem {
    type Error = Error;

    fn try_from(raw: RawRecommendation) -> Result<Self, Error> {
        let external_id = raw
            .external_id
            .or(raw.id)
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| {
                Error::Validation(format!(
                    "recommendation record {:?} has no identifier",
                    raw.title.as_deref().unwrap_or("<untitled>")
                ))
            })?;

        Ok(RecommendationItem {
            external_id,
            title: raw.title.unwrap_or_default(),
            content_type: raw.content_type.unwrap_or_default(),
            source: raw.source.unwrap_or_default(),
            poster_url: raw.poster_url,
            description: raw.description,
            compatibility_score: raw.compatibility_score.unwrap_or_default(),
        })
    }
}

/// Response of `GET match/recommendations/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub results: Vec<RawRecommendation>,
}

/// Body of `POST match/action/`.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRequest {
    pub external_id: String,
    pub source: String,
    pub category: String,
    pub action: FeedAction,
    pub title: String,
    pub metadata: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl ActionRequest {
    /// Build the wire body for acting on an item.
    pub fn for_item(item: &RecommendationItem, action: FeedAction) -> Self {
        Self {
            external_id: item.external_id.clone(),
            source: item.source.clone(),
            category: item.content_type.clone(),
            action,
            title: item.title.clone(),
            metadata: serde_json::json!({
                "compatibility_score": item.compatibility_score,
            }),
            description: item.description.clone(),
            poster_url: item.poster_url.clone(),
        }
    }
}

/// Response of `POST match/action/`.
#[derive(Debug, Clone, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
}

/// Response of `GET match/suggestions/`.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionsResponse {
    #[serde(default)]
    pub results: Vec<Suggestion>,
}

// ─────────────────────────────────────────────────────────────────────────
// Versus
// ─────────────────────────────────────────────────────────────────────────

/// Body of `POST versus/session/`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionRequest {
    pub total_rounds: u32,
}

/// Response of `POST versus/session/`. No round: round 1 arrives via the
/// session fetch.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionResponse {
    pub session: shortlist_types::Session,
}

/// Body of `POST versus/round/{id}/choice/`.
#[derive(Debug, Clone, Serialize)]
pub struct ChoiceRequest {
    pub choice: Choice,
}

// ─────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────

/// Error body the server attaches to non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best message available, falling back to the bare status.
    pub(crate) fn into_message(self, status: u16) -> String {
        self.detail
            .or(self.message)
            .unwrap_or_else(|| format!("HTTP {status}"))
    }
}
