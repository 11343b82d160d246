//! cardvault-scryfall - Scryfall-backed card search.
//!
//! All outbound traffic goes through one [`FetchClient`], which spaces
//! requests with a shared [`RateLimiter`] and retries a 429 response once.

mod api_url;
mod client;
mod endpoints;
mod gateway;
mod query;
mod rate_limit;

pub use api_url::ApiUrl;
pub use client::FetchClient;
pub use gateway::ScryfallGateway;
pub use query::compile_query;
pub use rate_limit::{RateLimiter, RetryPolicy};

/// Default Scryfall API base URL.
pub const DEFAULT_API_URL: &str = "https://api.scryfall.com";
