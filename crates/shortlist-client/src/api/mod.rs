//! Per-area API clients.

mod matching;
mod versus;

pub use matching::MatchApi;
pub use versus::VersusApi;
