//! Seams between the core and its card API and storage backends.

mod card_cache;
mod card_search;
mod collection_store;

pub use card_cache::CardCache;
pub use card_search::CardSearch;
pub use collection_store::CollectionStore;
