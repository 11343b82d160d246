//! Aggregate statistics over a user's collection.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::traits::CollectionStore;
use crate::types::UserId;

use super::{CollectionFilter, CollectionItem, Sort, Window};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Sum of quantities.
    pub total_cards: u64,
    /// Distinct card ids.
    pub unique_cards: u64,
    /// Number of collection rows.
    pub entries: u64,
    pub foil_cards: u64,
    /// Quantity per color name; cards without colors count as `colorless`.
    pub by_color: BTreeMap<String, u64>,
    pub by_rarity: BTreeMap<String, u64>,
    pub by_set: BTreeMap<String, u64>,
    /// Known USD value; copies without a price contribute nothing.
    pub estimated_value_usd: f64,
}

impl CollectionStats {
    pub fn from_items(items: &[CollectionItem]) -> Self {
        let mut stats = CollectionStats::default();
        let mut unique = HashSet::new();
        let mut value = 0.0;

        for item in items {
            let quantity = u64::from(item.entry.quantity);
            stats.entries += 1;
            stats.total_cards += quantity;
            unique.insert(&item.entry.scryfall_id);
            if item.entry.foil {
                stats.foil_cards += quantity;
            }

            if item.card.colors.is_empty() {
                *stats.by_color.entry("colorless".to_string()).or_default() += quantity;
            }
            for color in &item.card.colors {
                *stats.by_color.entry(color.name().to_string()).or_default() += quantity;
            }
            *stats
                .by_rarity
                .entry(item.card.rarity.to_string())
                .or_default() += quantity;
            *stats
                .by_set
                .entry(item.card.set_code.to_string())
                .or_default() += quantity;

            if let Some(price) = item.card.prices.usd_for(item.entry.foil) {
                value += price * quantity as f64;
            }
        }

        stats.unique_cards = unique.len() as u64;
        stats.estimated_value_usd = (value * 100.0).round() / 100.0;
        stats
    }
}

/// Aggregate every row the user owns.
pub async fn collection_stats<S>(store: &S, user: &UserId) -> Result<CollectionStats>
where
    S: CollectionStore + ?Sized,
{
    let items = store
        .fetch_page(user, &CollectionFilter::default(), &Sort::default(), Window::all())
        .await?;
    Ok(CollectionStats::from_items(&items))
}
