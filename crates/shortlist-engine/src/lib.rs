//! State machines for the shortlist client.
//!
//! Two components live here, both driven by UI events and backed by the
//! abstract traits in `shortlist-types`:
//!
//! - [`RecommendationFeed`]: an ordered sequence of not-yet-consumed
//!   recommendations with a cursor, automatic prefetch near exhaustion,
//!   and action-driven consumption.
//! - [`VersusSessionMachine`]: a round-based match session that submits
//!   one choice per round and reconciles with the server after any
//!   failed mutation.
//!
//! Both hold their state behind a lock that is never held across an await:
//! network calls are the only suspension points, and a completion applies
//! its result only if it is still authoritative for the current state.

pub mod config;
pub mod feed;
pub mod versus;

pub use config::FeedConfig;
pub use feed::{FeedSnapshot, RecommendationFeed};
pub use versus::{VersusSessionMachine, VersusSnapshot};
