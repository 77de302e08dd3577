//! Error types for the shortlist engine.
//!
//! Failures from heterogeneous sources (transport errors, HTTP statuses,
//! malformed payloads, misuse of a state machine) are normalized into this
//! one tagged type at the boundary that observes them, so the feed and the
//! versus machine never branch on anything else.

use thiserror::Error;

/// Result type alias using the shortlist error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Normalized error for all engine and client operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Transport-level failure: the request never produced an HTTP response.
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body, or a generic fallback.
        message: String,
    },

    /// Upstream data failed validation (e.g. a record without an identifier).
    #[error("Invalid data: {0}")]
    Validation(String),

    /// The operation is not valid for the current state of the machine.
    #[error("Invalid state: {0}")]
    State(String),
}

impl Error {
    /// Check if this is an authentication failure (expired/invalid token).
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Server { status: 401, .. })
    }

    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Server { status: 404, .. })
    }

    /// Check if the server itself failed (5xx).
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Server { status, .. } if *status >= 500)
    }

    /// Check if a plain retry of the same call could succeed.
    ///
    /// `Validation` and `State` errors are programmer/data-integrity
    /// signals and never transient.
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Server { status, .. } => *status >= 500,
            Error::Validation(_) | Error::State(_) => false,
        }
    }

    /// A message suitable for direct display to the user.
    pub fn user_message(&self) -> String {
        match self {
            Error::Network(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Error::Server { status: 401, .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Error::Server { status: 403, .. } => {
                "You don't have permission to do that.".to_string()
            }
            Error::Server { status: 404, .. } => {
                "That item could not be found.".to_string()
            }
            Error::Server { status, .. } if *status >= 500 => {
                "Something went wrong on our side. Please try again later.".to_string()
            }
            Error::Server { message, .. } => message.clone(),
            Error::Validation(message) | Error::State(message) => message.clone(),
        }
    }
}
