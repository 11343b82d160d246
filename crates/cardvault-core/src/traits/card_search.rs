//! Card search trait.

use async_trait::async_trait;

use crate::Result;
use crate::card::{Card, CardSet};
use crate::filter::SearchFilterSpec;
use crate::search::{SearchOptions, SearchPage};
use crate::types::{ScryfallId, SetCode};

/// Read access to an external card database.
#[async_trait]
pub trait CardSearch: Send + Sync {
    /// Full-text search. A query matching nothing yields an empty page.
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchPage<Card>>;

    /// Name suggestions for live typing. Never fails; errors yield no
    /// suggestions.
    async fn autocomplete(&self, query: &str) -> Vec<String>;

    async fn get_card(&self, id: &ScryfallId) -> Result<Card>;

    /// Exact name lookup, optionally restricted to one set.
    async fn get_card_by_name(&self, name: &str, set: Option<&SetCode>) -> Result<Card>;

    async fn get_card_by_fuzzy_name(&self, name: &str) -> Result<Card>;

    /// Search with structured filters compiled to the backend's syntax.
    async fn advanced_search(
        &self,
        filters: &SearchFilterSpec,
        options: &SearchOptions,
    ) -> Result<SearchPage<Card>>;

    async fn download_image(&self, url: &str) -> Result<Vec<u8>>;

    /// All printing sets.
    async fn sets(&self) -> Result<Vec<CardSet>>;
}
