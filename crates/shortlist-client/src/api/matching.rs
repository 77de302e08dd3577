//! Match API: recommendations, item actions, and cached suggestions.

use async_trait::async_trait;
use tracing::{debug, trace};

use shortlist_cache::{CacheKey, TtlCache};
use shortlist_types::{
    Error, FeedAction, FeedParams, RecommendationItem, RecommendationSource, Result, Suggestion,
};

use crate::client::ApiClient;
use crate::types::{
    ActionRequest, ActionResponse, RecommendationsResponse, SuggestionsResponse,
};

/// Match API client.
///
/// Recommendation batches are never cached (the server returns a freshly
/// ranked batch each time); the suggestion search is, when a cache is
/// attached. The cache is injected explicitly so its lifecycle stays with
/// the composition root.
pub struct MatchApi {
    client: ApiClient,
    cache: Option<TtlCache<Vec<Suggestion>>>,
}

impl MatchApi {
    pub(crate) fn new(client: ApiClient) -> Self {
        Self {
            client,
            cache: None,
        }
    }

    /// Attach a cache for the suggestion read path.
    pub fn with_cache(mut self, cache: TtlCache<Vec<Suggestion>>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Fetch one ranked batch of recommendations.
    ///
    /// Any record without an identifier fails the whole batch with
    /// [`Error::Validation`].
    pub async fn recommendations(
        &self,
        params: &FeedParams,
    ) -> Result<Vec<RecommendationItem>> {
        let mut query: Vec<(&str, String)> = vec![("count", params.count.to_string())];
        if let Some(category) = &params.category {
            query.push(("category", category.clone()));
        }

        let response: RecommendationsResponse = self
            .client
            .get_with_query("match/recommendations/", &query)
            .await?;

        response
            .results
            .into_iter()
            .map(RecommendationItem::try_from)
            .collect()
    }

    /// Record the user's action on an item.
    pub async fn submit_action(
        &self,
        item: &RecommendationItem,
        action: FeedAction,
    ) -> Result<()> {
        let body = ActionRequest::for_item(item, action);
        let response: ActionResponse = self.client.post("match/action/", &body).await?;
        if !response.success {
            return Err(Error::Server {
                status: 200,
                message: "the server did not accept the action".to_string(),
            });
        }
        Ok(())
    }

    /// Search catalog suggestions, going through the attached cache.
    ///
    /// Equivalent queries collapse into one cache slot; a hit skips HTTP
    /// entirely. Without a cache every call hits the server.
    pub async fn suggestions(
        &self,
        query: &str,
        category: Option<&str>,
        limit: u32,
    ) -> Result<Vec<Suggestion>> {
        let key = CacheKey::new("suggestions")
            .param("q", query)
            .opt_param("category", category)
            .param("limit", limit)
            .build();

        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(&key) {
                trace!(key = %key, "suggestions served from cache");
                return Ok(hit);
            }
        }

        let mut params: Vec<(&str, String)> = vec![
            ("q", query.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(category) = category {
            params.push(("category", category.to_string()));
        }

        let response: SuggestionsResponse = self
            .client
            .get_with_query("match/suggestions/", &params)
            .await?;

        if let Some(cache) = &self.cache {
            cache.insert(&key, response.results.clone());
        }
        Ok(response.results)
    }

    /// Drop every cached suggestion batch.
    pub fn invalidate_suggestions(&self) {
        if let Some(cache) = &self.cache {
            let removed = cache.invalidate_prefix(&CacheKey::namespace("suggestions"));
            debug!(removed, "suggestion cache invalidated");
        }
    }
}

#[async_trait]
impl RecommendationSource for MatchApi {
    async fn fetch_recommendations(
        &self,
        params: &FeedParams,
    ) -> Result<Vec<RecommendationItem>> {
        self.recommendations(params).await
    }

    async fn submit_action(&self, item: &RecommendationItem, action: FeedAction) -> Result<()> {
        MatchApi::submit_action(self, item, action).await
    }
}
