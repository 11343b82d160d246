//! Adding cards to a collection.

use chrono::Utc;
use tracing::debug;

use crate::Result;
use crate::card::CardRecord;
use crate::traits::{CardCache, CardSearch, CollectionStore};
use crate::types::UserId;

use super::{AddOutcome, NewCollectionEntry};

/// Add copies of a card, caching the card first when it is not cached yet.
///
/// Every collection row therefore refers to a cached card. A card the API
/// does not know fails with a not-found error and adds nothing.
pub async fn add_card<G, S>(
    search: &G,
    store: &S,
    user: &UserId,
    new: NewCollectionEntry,
) -> Result<AddOutcome>
where
    G: CardSearch + ?Sized,
    S: CardCache + CollectionStore + ?Sized,
{
    if store.get_card(&new.scryfall_id).await?.is_none() {
        let card = search.get_card(&new.scryfall_id).await?;
        store
            .upsert_card(&CardRecord::from_card(&card, Utc::now()))
            .await?;
        debug!(scryfall_id = %new.scryfall_id, "cached card for new entry");
    }

    store.add_entry(user, new).await
}
