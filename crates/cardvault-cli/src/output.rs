//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use cardvault_core::collection::CollectionItem;
use cardvault_core::{Card, CardSet, EnrichedCard, Rarity};

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a value as compact JSON.
pub fn json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    println!("{}", json);
    Ok(())
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

fn rarity(rarity: Rarity) -> String {
    let label = rarity.to_string();
    match rarity {
        Rarity::Mythic => label.red().to_string(),
        Rarity::Rare => label.yellow().to_string(),
        Rarity::Uncommon => label.cyan().to_string(),
        _ => label.dimmed().to_string(),
    }
}

/// One line per card: name, mana cost, set and rarity, id.
pub fn card_line(card: &Card) {
    println!(
        "{}  {}  {} {}  {}",
        card.name.bold(),
        card.mana_cost.as_deref().unwrap_or(""),
        card.set.as_str().to_uppercase(),
        rarity(card.rarity),
        card.id.as_str().dimmed()
    );
}

/// Like [`card_line`], with the owned quantity in front.
pub fn enriched_line(card: &EnrichedCard) {
    let owned = if card.in_collection {
        format!("{:>4}x", card.collection_quantity).green().to_string()
    } else {
        "    -".dimmed().to_string()
    };
    println!(
        "{} {}  {} {}  {}",
        owned,
        card.card.name.bold(),
        card.card.set_code.as_str().to_uppercase(),
        rarity(card.card.rarity),
        card.card.scryfall_id.as_str().dimmed()
    );
}

/// A collection row with its card.
pub fn entry_line(item: &CollectionItem) {
    let foil = if item.entry.foil { " foil" } else { "" };
    println!(
        "{:>4}x {}  {} {}{}  {}",
        item.entry.quantity,
        item.card.name.bold(),
        item.card.set_code.as_str().to_uppercase(),
        item.entry.condition,
        foil.magenta(),
        item.entry.id.to_string().dimmed()
    );
}

pub fn set_line(set: &CardSet) {
    println!(
        "{:<6} {}  {}",
        set.code.as_str().to_uppercase().bold(),
        set.name,
        set.released_at.as_deref().unwrap_or("").dimmed()
    );
}

/// Hint for fetching the page after `page`, if there is one to ask for.
pub fn next_page(page: u32) {
    if let Some(next) = page.checked_add(1) {
        eprintln!("{}: --page {}", "Next".dimmed(), next);
    }
}
