//! Credential store for the API bearer token.

use parking_lot::RwLock;

/// Persistent store for the user's bearer token.
///
/// The client reads the token at request time, so `set`/`clear` take
/// effect on the next request without rebuilding anything. Implementations
/// backed by real persistence (keychain, browser storage) live in the host
/// application; the engine only needs get/set/clear.
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Current token, if the user is signed in.
    fn get(&self) -> Option<String>;

    /// Replace the stored token.
    fn set(&self, token: &str);

    /// Remove the stored token (sign-out, or a rejected credential).
    fn clear(&self);
}

/// Process-memory token store; the default when none is supplied.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl InMemoryTokenStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for InMemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.read().clone()
    }

    fn set(&self, token: &str) {
        *self.token.write() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.write() = None;
    }
}
