//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use tracing::warn;
use url::Url;

use shortlist_types::{Error, Result};

use crate::api::{MatchApi, VersusApi};
use crate::token::{InMemoryTokenStore, TokenStore};
use crate::types::ErrorBody;

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Shortlist API client.
///
/// Provides typed access to the catalog server's match and versus
/// endpoints.
///
/// # Example
///
/// ```no_run
/// use shortlist_client::ApiClient;
///
/// # async fn example() -> shortlist_types::Result<()> {
/// let client = ApiClient::builder()
///     .base_url("https://api.shortlist.example")
///     .auth_token("secret")
///     .build()?;
///
/// let snapshot = client.versus().session().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ApiClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for API requests.
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
    /// Credential store read at request time.
    pub(crate) tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the credential store, for sign-in/sign-out flows.
    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    // ─────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────

    /// Access the match API (recommendations, actions, suggestions).
    pub fn matching(&self) -> MatchApi {
        MatchApi::new(self.clone())
    }

    /// Access the versus session API.
    pub fn versus(&self) -> VersusApi {
        VersusApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner
            .base_url
            .join(path)
            .map_err(|err| Error::Validation(format!("invalid request path {path:?}: {err}")))
    }

    /// Start a request with the bearer token read from the store.
    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let mut builder = self
            .inner
            .http
            .request(method, url)
            .timeout(self.inner.timeout);
        if let Some(token) = self.inner.tokens.get() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(transport_error)?;
        self.handle_response(response).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let response = self
            .request(Method::GET, url)
            .query(query)
            .send()
            .await
            .map_err(transport_error)?;
        self.handle_response(response).await
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let response = self
            .request(Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        self.handle_response(response).await
    }

    /// Handle a response, extracting the body or the normalized error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            response
                .json()
                .await
                .map_err(|err| Error::Validation(format!("malformed response body: {err}")))
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract a normalized error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.into_message(status),
            Err(_) => format!("HTTP {status}"),
        };
        if status == 401 {
            warn!("request rejected as unauthenticated");
        }
        Error::Server { status, message }
    }
}

/// Normalize a transport-level failure.
///
/// Anything that never produced an HTTP response is a network error; the
/// status-bearing path goes through `extract_error` instead.
fn transport_error(err: reqwest::Error) -> Error {
    Error::Network(err.to_string())
}

/// Builder for creating an [`ApiClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    auth_token: Option<String>,
    token_store: Option<Arc<dyn TokenStore>>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            token_store: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the base URL for the server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Seed the credential store with a token.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Use a custom credential store (defaults to an in-memory one).
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ApiClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Validation("base_url is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)
            .map_err(|err| Error::Validation(format!("invalid base_url: {err}")))?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let tokens: Arc<dyn TokenStore> = self
            .token_store
            .unwrap_or_else(|| Arc::new(InMemoryTokenStore::new()));
        if let Some(token) = &self.auth_token {
            tokens.set(token);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("shortlist-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()
            .map_err(|err| Error::Validation(format!("failed to build HTTP client: {err}")))?;

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                tokens,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::new().build();
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8080")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_url_building() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8080")
            .build()
            .unwrap();

        let url = client.url("match/recommendations/").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/match/recommendations/"
        );

        let url = client.url("/versus/session/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/versus/session/");
    }

    #[test]
    fn test_auth_token_seeds_store() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8080")
            .auth_token("secret")
            .build()
            .unwrap();

        assert_eq!(client.token_store().get(), Some("secret".to_string()));
    }
}
