//! Collection store trait.

use async_trait::async_trait;
use uuid::Uuid;

use crate::Result;
use crate::collection::{
    AddOutcome, CollectionEntry, CollectionFilter, CollectionItem, EntryUpdate,
    NewCollectionEntry, Sort, Window,
};
use crate::types::{ScryfallId, UserId};

/// Per-user collection rows.
///
/// Every method is scoped to `user`; no call can read or change another
/// user's rows.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Add copies. A row with the same (card, condition, foil) has its
    /// quantity increased instead of a new row being created.
    async fn add_entry(&self, user: &UserId, entry: NewCollectionEntry) -> Result<AddOutcome>;

    async fn update_entry(
        &self,
        user: &UserId,
        id: Uuid,
        update: EntryUpdate,
    ) -> Result<CollectionEntry>;

    async fn remove_entry(&self, user: &UserId, id: Uuid) -> Result<()>;

    /// Total copies of a card across all rows, or `None` when the user has
    /// no row for it.
    async fn owned_quantity(&self, user: &UserId, id: &ScryfallId) -> Result<Option<u32>>;

    /// Rows matching `filter`, joined with cached cards, ordered by `sort`
    /// and cut to `window`. Rows whose card is not cached are skipped.
    async fn fetch_page(
        &self,
        user: &UserId,
        filter: &CollectionFilter,
        sort: &Sort,
        window: Window,
    ) -> Result<Vec<CollectionItem>>;

    /// Number of rows `fetch_page` would return with an unbounded window.
    async fn count(&self, user: &UserId, filter: &CollectionFilter) -> Result<u64>;
}
