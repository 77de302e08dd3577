//! Shared types for the shortlist recommendation engine.
//!
//! This crate holds the domain model (recommendation items, versus sessions
//! and rounds), the normalized error taxonomy every component reports
//! through, and the backend traits that decouple the state machines in
//! `shortlist-engine` from the HTTP client in `shortlist-client`.

pub mod backend;
pub mod error;
pub mod model;

pub use backend::{RecommendationSource, VersusBackend};
pub use error::{Error, Result};
pub use model::{
    Choice, ChoiceOutcome, FeedAction, FeedParams, RecommendationItem, Round, Session,
    SessionSnapshot, SessionSummary, Suggestion,
};
