//! Collection entries and their mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;
use crate::error::ValidationError;
use crate::types::{Condition, ScryfallId, UserId};

/// Upper bound on the quantity of a single add or update.
pub const MAX_QUANTITY: u32 = 9_999;

/// Upper bound on note length, in characters.
pub const MAX_NOTES_LEN: usize = 500;

/// Copies of one card a user owns in one condition and finish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub id: Uuid,
    pub user_id: UserId,
    pub scryfall_id: ScryfallId,
    pub quantity: u32,
    pub condition: Condition,
    pub foil: bool,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CollectionEntry {
    pub fn new(user: &UserId, new: NewCollectionEntry, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user.clone(),
            scryfall_id: new.scryfall_id,
            quantity: new.quantity,
            condition: new.condition,
            foil: new.foil,
            notes: new.notes,
            created_at: now,
            updated_at: now,
        }
    }

    /// True if this entry holds the same (card, condition, foil) key.
    pub fn same_key(&self, scryfall_id: &ScryfallId, condition: Condition, foil: bool) -> bool {
        &self.scryfall_id == scryfall_id && self.condition == condition && self.foil == foil
    }

    /// Fold a duplicate add into this entry.
    pub fn merge(&mut self, new: &NewCollectionEntry, now: DateTime<Utc>) {
        self.quantity = self.quantity.saturating_add(new.quantity);
        if new.notes.is_some() {
            self.notes = new.notes.clone();
        }
        self.updated_at = now;
    }

    pub fn apply(&mut self, update: &EntryUpdate, now: DateTime<Utc>) {
        if let Some(quantity) = update.quantity {
            self.quantity = quantity;
        }
        if let Some(condition) = update.condition {
            self.condition = condition;
        }
        if let Some(foil) = update.foil {
            self.foil = foil;
        }
        if let Some(notes) = &update.notes {
            self.notes = notes.clone();
        }
        self.updated_at = now;
    }
}

/// A validated request to add copies to a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCollectionEntry {
    pub scryfall_id: ScryfallId,
    pub quantity: u32,
    pub condition: Condition,
    pub foil: bool,
    pub notes: Option<String>,
}

/// Result of an add: the stored entry and whether it was merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddOutcome {
    pub entry: CollectionEntry,
    pub merged: bool,
}

/// Raw add request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddEntryRequest {
    pub scryfall_id: Option<String>,
    pub quantity: Option<i64>,
    pub condition: Option<String>,
    pub foil: Option<bool>,
    pub notes: Option<String>,
}

impl AddEntryRequest {
    /// Validate every field, reporting all rejected fields at once.
    ///
    /// Quantity defaults to 1, condition to near mint, foil to false.
    pub fn validate(self) -> Result<NewCollectionEntry> {
        let mut errors = ValidationError::new();

        let scryfall_id = match self.scryfall_id.as_deref() {
            None => {
                errors.push("scryfall_id", "is required");
                None
            }
            Some(raw) => ScryfallId::new(raw)
                .map_err(|_| errors.push("scryfall_id", "is not a valid card id"))
                .ok(),
        };

        let quantity = match self.quantity {
            None => Some(1),
            Some(q) => check_quantity(q, 1, &mut errors),
        };

        let condition = parse_condition(self.condition.as_deref(), &mut errors);
        let notes = check_notes(self.notes, &mut errors);

        match (scryfall_id, quantity, condition, notes) {
            (Some(scryfall_id), Some(quantity), Some(condition), Some(notes))
                if errors.is_empty() =>
            {
                Ok(NewCollectionEntry {
                    scryfall_id,
                    quantity,
                    condition,
                    foil: self.foil.unwrap_or(false),
                    notes,
                })
            }
            _ => Err(errors.into()),
        }
    }
}

/// A validated partial update of an entry.
///
/// `notes: Some(None)` clears the notes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryUpdate {
    pub quantity: Option<u32>,
    pub condition: Option<Condition>,
    pub foil: Option<bool>,
    pub notes: Option<Option<String>>,
}

/// Raw update request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEntryRequest {
    pub quantity: Option<i64>,
    pub condition: Option<String>,
    pub foil: Option<bool>,
    pub notes: Option<String>,
}

impl UpdateEntryRequest {
    /// Validate the update. An empty `notes` string clears the notes.
    pub fn validate(self) -> Result<EntryUpdate> {
        let mut errors = ValidationError::new();

        let quantity = match self.quantity {
            None => None,
            Some(q) => check_quantity(q, 0, &mut errors),
        };
        let condition = match self.condition.as_deref() {
            None => None,
            raw => parse_condition(raw, &mut errors),
        };
        let notes = match self.notes {
            None => None,
            Some(n) if n.trim().is_empty() => Some(None),
            Some(n) => check_notes(Some(n), &mut errors),
        };

        if self.quantity.is_none()
            && self.condition.is_none()
            && self.foil.is_none()
            && notes.is_none()
            && errors.is_empty()
        {
            errors.push("body", "at least one field must be provided");
        }

        errors.finish(EntryUpdate {
            quantity,
            condition,
            foil: self.foil,
            notes,
        })
    }
}

fn check_quantity(q: i64, min: u32, errors: &mut ValidationError) -> Option<u32> {
    if q < i64::from(min) || q > i64::from(MAX_QUANTITY) {
        errors.push(
            "quantity",
            format!("must be between {} and {}", min, MAX_QUANTITY),
        );
        None
    } else {
        u32::try_from(q).ok()
    }
}

fn parse_condition(raw: Option<&str>, errors: &mut ValidationError) -> Option<Condition> {
    match raw {
        None => Some(Condition::default()),
        Some(raw) => raw
            .parse()
            .map_err(|_| errors.push("condition", format!("unknown condition '{}'", raw)))
            .ok(),
    }
}

fn check_notes(notes: Option<String>, errors: &mut ValidationError) -> Option<Option<String>> {
    match notes {
        Some(n) if n.chars().count() > MAX_NOTES_LEN => {
            errors.push(
                "notes",
                format!("must be at most {} characters", MAX_NOTES_LEN),
            );
            None
        }
        Some(n) if n.trim().is_empty() => Some(None),
        other => Some(other),
    }
}
