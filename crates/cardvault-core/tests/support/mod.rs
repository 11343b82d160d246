//! In-memory backends for exercising the core without I/O.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use cardvault_core::collection::{
    AddOutcome, CollectionEntry, CollectionFilter, CollectionItem, EntryUpdate,
    NewCollectionEntry, Sort, Window,
};
use cardvault_core::error::{NotFoundError, StorageError};
use cardvault_core::{
    Card, CardCache, CardRecord, CardSearch, CardSet, CollectionStore, Error, Result,
    ScryfallId, SearchFilterSpec, SearchOptions, SearchPage, SetCode, UserId,
};

/// Card cache and collection store backed by hash maps.
#[derive(Default)]
pub struct MemoryStore {
    cards: Mutex<HashMap<ScryfallId, CardRecord>>,
    entries: Mutex<Vec<CollectionEntry>>,
    pub upserts: AtomicUsize,
    failing_cards: Mutex<HashSet<ScryfallId>>,
    failing_upserts: Mutex<HashSet<ScryfallId>>,
    failing_ownership: Mutex<HashSet<ScryfallId>>,
}

fn injected(id: &ScryfallId) -> Error {
    StorageError::Corrupt {
        path: id.to_string(),
        message: "injected failure".to_string(),
    }
    .into()
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every cache read of `id` fail.
    pub fn fail_card(&self, id: &str) {
        self.failing_cards
            .lock()
            .unwrap()
            .insert(ScryfallId::new(id).unwrap());
    }

    /// Make every cache write of `id` fail.
    pub fn fail_upsert(&self, id: &str) {
        self.failing_upserts
            .lock()
            .unwrap()
            .insert(ScryfallId::new(id).unwrap());
    }

    /// Make every ownership lookup of `id` fail.
    pub fn fail_ownership(&self, id: &str) {
        self.failing_ownership
            .lock()
            .unwrap()
            .insert(ScryfallId::new(id).unwrap());
    }

    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    pub fn cached(&self, id: &str) -> Option<CardRecord> {
        self.cards
            .lock()
            .unwrap()
            .get(&ScryfallId::new(id).unwrap())
            .cloned()
    }

    fn joined(&self, user: &UserId, filter: &CollectionFilter) -> Vec<CollectionItem> {
        let cards = self.cards.lock().unwrap();
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| &e.user_id == user)
            .filter_map(|e| {
                cards.get(&e.scryfall_id).map(|c| CollectionItem {
                    entry: e.clone(),
                    card: c.clone(),
                })
            })
            .filter(|item| filter.matches(&item.entry, &item.card))
            .collect()
    }
}

#[async_trait]
impl CardCache for MemoryStore {
    async fn get_card(&self, id: &ScryfallId) -> Result<Option<CardRecord>> {
        if self.failing_cards.lock().unwrap().contains(id) {
            return Err(injected(id));
        }
        Ok(self.cards.lock().unwrap().get(id).cloned())
    }

    async fn upsert_card(&self, record: &CardRecord) -> Result<()> {
        if self.failing_upserts.lock().unwrap().contains(&record.scryfall_id) {
            return Err(injected(&record.scryfall_id));
        }
        self.upserts.fetch_add(1, Ordering::SeqCst);
        self.cards
            .lock()
            .unwrap()
            .insert(record.scryfall_id.clone(), record.clone());
        Ok(())
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn add_entry(&self, user: &UserId, new: NewCollectionEntry) -> Result<AddOutcome> {
        let now = Utc::now();
        let mut entries = self.entries.lock().unwrap();
        if let Some(existing) = entries.iter_mut().find(|e| {
            &e.user_id == user && e.same_key(&new.scryfall_id, new.condition, new.foil)
        }) {
            existing.merge(&new, now);
            return Ok(AddOutcome {
                entry: existing.clone(),
                merged: true,
            });
        }
        let entry = CollectionEntry::new(user, new, now);
        entries.push(entry.clone());
        Ok(AddOutcome {
            entry,
            merged: false,
        })
    }

    async fn update_entry(
        &self,
        user: &UserId,
        id: Uuid,
        update: EntryUpdate,
    ) -> Result<CollectionEntry> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .iter_mut()
            .find(|e| &e.user_id == user && e.id == id)
            .ok_or_else(|| NotFoundError::Entry { id: id.to_string() })?;
        entry.apply(&update, Utc::now());
        Ok(entry.clone())
    }

    async fn remove_entry(&self, user: &UserId, id: Uuid) -> Result<()> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| !(&e.user_id == user && e.id == id));
        if entries.len() == before {
            return Err(NotFoundError::Entry { id: id.to_string() }.into());
        }
        Ok(())
    }

    async fn owned_quantity(&self, user: &UserId, id: &ScryfallId) -> Result<Option<u32>> {
        if self.failing_ownership.lock().unwrap().contains(id) {
            return Err(injected(id));
        }
        let entries = self.entries.lock().unwrap();
        let mut rows = entries
            .iter()
            .filter(|e| &e.user_id == user && &e.scryfall_id == id)
            .peekable();
        if rows.peek().is_none() {
            return Ok(None);
        }
        Ok(Some(rows.map(|e| e.quantity).sum()))
    }

    async fn fetch_page(
        &self,
        user: &UserId,
        filter: &CollectionFilter,
        sort: &Sort,
        window: Window,
    ) -> Result<Vec<CollectionItem>> {
        let mut items = self.joined(user, filter);
        items.sort_by(|a, b| sort.compare(a, b));
        Ok(window.apply(items))
    }

    async fn count(&self, user: &UserId, filter: &CollectionFilter) -> Result<u64> {
        Ok(self.joined(user, filter).len() as u64)
    }
}

/// Card search answering id lookups from a fixed set of cards.
#[derive(Default)]
pub struct StubSearch {
    cards: HashMap<ScryfallId, Card>,
    lookups: AtomicUsize,
}

impl StubSearch {
    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into_iter().map(|c| (c.id.clone(), c)).collect(),
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn not_found(query: &str) -> Error {
        NotFoundError::Card {
            query: query.to_string(),
        }
        .into()
    }
}

#[async_trait]
impl CardSearch for StubSearch {
    async fn search(&self, _query: &str, _options: &SearchOptions) -> Result<SearchPage<Card>> {
        Ok(SearchPage::empty())
    }

    async fn autocomplete(&self, _query: &str) -> Vec<String> {
        Vec::new()
    }

    async fn get_card(&self, id: &ScryfallId) -> Result<Card> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.cards
            .get(id)
            .cloned()
            .ok_or_else(|| Self::not_found(id.as_str()))
    }

    async fn get_card_by_name(&self, name: &str, _set: Option<&SetCode>) -> Result<Card> {
        self.cards
            .values()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| Self::not_found(name))
    }

    async fn get_card_by_fuzzy_name(&self, name: &str) -> Result<Card> {
        self.get_card_by_name(name, None).await
    }

    async fn advanced_search(
        &self,
        _filters: &SearchFilterSpec,
        _options: &SearchOptions,
    ) -> Result<SearchPage<Card>> {
        Ok(SearchPage::empty())
    }

    async fn download_image(&self, url: &str) -> Result<Vec<u8>> {
        Err(Self::not_found(url))
    }

    async fn sets(&self) -> Result<Vec<CardSet>> {
        Ok(Vec::new())
    }
}

pub fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

/// A card payload as the API returns it.
pub fn card(id: &str, name: &str) -> Card {
    card_with(id, name, &["R"], "Instant", 1.0, "m11", "common")
}

pub fn card_with(
    id: &str,
    name: &str,
    colors: &[&str],
    type_line: &str,
    cmc: f64,
    set: &str,
    rarity: &str,
) -> Card {
    serde_json::from_value(json!({
        "id": id,
        "name": name,
        "cmc": cmc,
        "type_line": type_line,
        "colors": colors,
        "color_identity": colors,
        "prices": { "usd": "1.00" },
        "set": set,
        "set_name": set.to_uppercase(),
        "rarity": rarity,
    }))
    .unwrap()
}

pub fn error_is_not_found(err: &Error) -> bool {
    matches!(err, Error::NotFound(_))
}
