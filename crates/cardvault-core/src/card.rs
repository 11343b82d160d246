//! Card payloads and the cached card record.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Color, Rarity, ScryfallId, SetCode};

/// Image URIs for one card face.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageUris {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_crop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_crop: Option<String>,
}

/// Price snapshot in the currencies the card API reports.
///
/// Prices arrive as decimal strings and are kept that way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prices {
    #[serde(default)]
    pub usd: Option<String>,
    #[serde(default)]
    pub usd_foil: Option<String>,
    #[serde(default)]
    pub usd_etched: Option<String>,
    #[serde(default)]
    pub eur: Option<String>,
    #[serde(default)]
    pub eur_foil: Option<String>,
    #[serde(default)]
    pub tix: Option<String>,
}

impl Prices {
    /// USD price of one copy, preferring the foil price for foils.
    pub fn usd_for(&self, foil: bool) -> Option<f64> {
        let price = if foil {
            self.usd_foil.as_deref().or(self.usd_etched.as_deref())
        } else {
            self.usd.as_deref()
        };
        price.and_then(|p| p.parse().ok())
    }
}

/// One face of a multi-faced card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    pub name: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

/// A card as returned by the external card API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: ScryfallId,
    pub name: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub cmc: f64,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub oracle_text: Option<String>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub color_identity: Vec<Color>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub power: Option<String>,
    #[serde(default)]
    pub toughness: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub card_faces: Vec<CardFace>,
    #[serde(default)]
    pub prices: Prices,
    #[serde(default)]
    pub legalities: BTreeMap<String, String>,
    pub set: SetCode,
    #[serde(default)]
    pub set_name: String,
    pub rarity: Rarity,
}

impl Card {
    /// Image URIs of the card, falling back to the front face.
    pub fn images(&self) -> ImageUris {
        self.image_uris
            .clone()
            .or_else(|| self.card_faces.iter().find_map(|f| f.image_uris.clone()))
            .unwrap_or_default()
    }

    /// Colors of the card, falling back to its identity for faced cards
    /// that carry colors only per face.
    fn record_colors(&self) -> Vec<Color> {
        if self.colors.is_empty() && !self.card_faces.is_empty() {
            self.color_identity.clone()
        } else {
            self.colors.clone()
        }
    }
}

/// Card as stored in the local cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    pub scryfall_id: ScryfallId,
    pub name: String,
    pub mana_cost: Option<String>,
    pub cmc: f64,
    pub type_line: String,
    pub oracle_text: Option<String>,
    pub colors: Vec<Color>,
    pub color_identity: Vec<Color>,
    pub keywords: Option<Vec<String>>,
    pub power: Option<String>,
    pub toughness: Option<String>,
    pub image_uris: ImageUris,
    pub prices: Prices,
    pub legalities: BTreeMap<String, String>,
    pub set_code: SetCode,
    pub set_name: String,
    pub rarity: Rarity,
    pub cached_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CardRecord {
    /// Derive a cache row from an API payload.
    pub fn from_card(card: &Card, now: DateTime<Utc>) -> Self {
        let oracle_text = card.oracle_text.clone().or_else(|| {
            let faces: Vec<&str> = card
                .card_faces
                .iter()
                .filter_map(|f| f.oracle_text.as_deref())
                .collect();
            (!faces.is_empty()).then(|| faces.join("\n//\n"))
        });

        Self {
            scryfall_id: card.id.clone(),
            name: card.name.clone(),
            mana_cost: card.mana_cost.clone(),
            cmc: card.cmc,
            type_line: card.type_line.clone(),
            oracle_text,
            colors: card.record_colors(),
            color_identity: card.color_identity.clone(),
            keywords: (!card.keywords.is_empty()).then(|| card.keywords.clone()),
            power: card.power.clone(),
            toughness: card.toughness.clone(),
            image_uris: card.images(),
            prices: card.prices.clone(),
            legalities: card.legalities.clone(),
            set_code: card.set.clone(),
            set_name: card.set_name.clone(),
            rarity: card.rarity,
            cached_at: now,
            updated_at: now,
        }
    }
}

/// A card annotated with the requesting user's ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedCard {
    #[serde(flatten)]
    pub card: CardRecord,
    pub in_collection: bool,
    pub collection_quantity: u32,
}

impl EnrichedCard {
    /// Unowned card built straight from the API payload.
    pub fn unowned(card: &Card) -> Self {
        Self {
            card: CardRecord::from_card(card, Utc::now()),
            in_collection: false,
            collection_quantity: 0,
        }
    }
}

/// A printing set as listed by the card API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardSet {
    pub code: SetCode,
    pub name: String,
    #[serde(default)]
    pub set_type: Option<String>,
    #[serde(default)]
    pub released_at: Option<String>,
    #[serde(default)]
    pub card_count: u32,
    #[serde(default)]
    pub icon_svg_uri: Option<String>,
}
