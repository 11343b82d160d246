//! cardvault-core - Core types and traits for the cardvault card collection
//! backend.
//!
//! This crate holds the domain model (cards, collection entries, search
//! filters), the error taxonomy, the traits implemented by card API and
//! storage backends, and the backend-independent logic built on them: the
//! cache-and-enrich pipeline, collection query building and statistics.

pub mod card;
pub mod collection;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod search;
pub mod traits;
pub mod types;

pub use card::{Card, CardRecord, CardSet, EnrichedCard};
pub use enrich::EnrichPipeline;
pub use error::Error;
pub use filter::{FormatLegality, NumericRange, SearchFilterSpec};
pub use search::{SearchOptions, SearchPage, UniqueMode};
pub use traits::{CardCache, CardSearch, CollectionStore};
pub use types::{Color, ColorSet, Condition, Rarity, ScryfallId, SetCode, UserId};

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
