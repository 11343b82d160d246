//! Cache-and-enrich pipeline for search results.

use chrono::Utc;
use futures_util::future::join_all;
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::card::{Card, CardRecord, EnrichedCard};
use crate::search::SearchPage;
use crate::traits::{CardCache, CollectionStore};
use crate::types::UserId;

/// Ensures every card of a result page is cached and annotates it with the
/// requesting user's ownership.
///
/// Cards are enriched concurrently. A card whose cache or ownership lookup
/// fails is returned unowned, built from the API payload, so a page always
/// keeps the cardinality and order of its input.
pub struct EnrichPipeline<'a, C: ?Sized, S: ?Sized> {
    cache: &'a C,
    collection: &'a S,
}

impl<'a, C, S> EnrichPipeline<'a, C, S>
where
    C: CardCache + ?Sized,
    S: CollectionStore + ?Sized,
{
    pub fn new(cache: &'a C, collection: &'a S) -> Self {
        Self { cache, collection }
    }

    /// Enrich a whole search page, keeping its pagination metadata.
    pub async fn enrich_page(
        &self,
        user: &UserId,
        page: SearchPage<Card>,
    ) -> SearchPage<EnrichedCard> {
        let data = self.enrich(user, &page.data).await;
        page.with_data(data)
    }

    #[instrument(skip(self, user, cards), fields(user = %user, cards = cards.len()))]
    pub async fn enrich(&self, user: &UserId, cards: &[Card]) -> Vec<EnrichedCard> {
        join_all(cards.iter().map(|card| self.enrich_one(user, card))).await
    }

    async fn enrich_one(&self, user: &UserId, card: &Card) -> EnrichedCard {
        match self.try_enrich(user, card).await {
            Ok(enriched) => enriched,
            Err(e) => {
                warn!(card_id = %card.id, error = %e, "enrichment failed, returning card unowned");
                EnrichedCard::unowned(card)
            }
        }
    }

    async fn try_enrich(&self, user: &UserId, card: &Card) -> Result<EnrichedCard> {
        let record = match self.cache.get_card(&card.id).await? {
            Some(record) => record,
            None => {
                let record = CardRecord::from_card(card, Utc::now());
                self.cache.upsert_card(&record).await?;
                debug!(card_id = %card.id, "cached card");
                record
            }
        };

        let quantity = self.collection.owned_quantity(user, &card.id).await?;

        Ok(EnrichedCard {
            card: record,
            in_collection: quantity.is_some(),
            collection_quantity: quantity.unwrap_or(0),
        })
    }

    /// Cache a freshly fetched card unconditionally and annotate it.
    pub async fn refresh(&self, user: &UserId, card: &Card) -> Result<EnrichedCard> {
        let now = Utc::now();
        let mut record = CardRecord::from_card(card, now);
        if let Some(existing) = self.cache.get_card(&card.id).await? {
            record.cached_at = existing.cached_at;
        }
        self.cache.upsert_card(&record).await?;

        let quantity = self.collection.owned_quantity(user, &card.id).await?;
        Ok(EnrichedCard {
            card: record,
            in_collection: quantity.is_some(),
            collection_quantity: quantity.unwrap_or(0),
        })
    }
}
