//! HTTP client for the shortlist catalog API.
//!
//! This crate provides a typed client for the catalog server's match and
//! versus endpoints, and implements the backend traits consumed by
//! `shortlist-engine`.
//!
//! # Example
//!
//! ```no_run
//! use shortlist_client::ApiClient;
//! use shortlist_types::{FeedParams, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = ApiClient::builder()
//!     .base_url("https://api.shortlist.example")
//!     .auth_token("secret")
//!     .build()?;
//!
//! let batch = client
//!     .matching()
//!     .recommendations(&FeedParams::new().with_category("movies"))
//!     .await?;
//! println!("got {} recommendations", batch.len());
//! # Ok(())
//! # }
//! ```
//!
//! Every request carries the bearer token read from the client's
//! [`TokenStore`] at send time, so signing in or out takes effect without
//! rebuilding the client. Failures are normalized into the shared
//! [`shortlist_types::Error`] taxonomy at this crate's response-handling
//! boundary; nothing above it ever sees a raw transport error.

pub mod api;
pub mod client;
pub mod token;
pub mod types;

pub use api::{MatchApi, VersusApi};
pub use client::{ApiClient, ClientBuilder};
pub use token::{InMemoryTokenStore, TokenStore};
