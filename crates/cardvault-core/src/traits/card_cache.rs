//! Card cache trait.

use async_trait::async_trait;

use crate::Result;
use crate::card::CardRecord;
use crate::types::ScryfallId;

/// Shared cache of card records keyed by external identifier.
#[async_trait]
pub trait CardCache: Send + Sync {
    /// Read a cached card.
    async fn get_card(&self, id: &ScryfallId) -> Result<Option<CardRecord>>;

    /// Insert or replace a cached card. An existing row keeps its
    /// `cached_at` timestamp.
    async fn upsert_card(&self, record: &CardRecord) -> Result<()>;
}
