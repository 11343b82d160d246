//! Filesystem storage for cards and collections.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use fs2::FileExt;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use cardvault_core::collection::{
    AddOutcome, CollectionEntry, CollectionFilter, CollectionItem, EntryUpdate,
    NewCollectionEntry, Sort, Window,
};
use cardvault_core::error::{Error, NotFoundError, StorageError};
use cardvault_core::{CardCache, CardRecord, CollectionStore, Result, ScryfallId, UserId};

/// Filesystem-backed card cache and collection store.
///
/// Layout under the root directory:
///
/// ```text
/// cards/<scryfall_id>.json     cached card records
/// collections/<user_id>.json   one array of entries per user
/// store.lock                   exclusive lock for read-modify-write cycles
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a new file store at the given root directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn cards_dir(&self) -> PathBuf {
        self.root.join("cards")
    }

    fn collections_dir(&self) -> PathBuf {
        self.root.join("collections")
    }

    fn card_path(&self, id: &ScryfallId) -> PathBuf {
        self.cards_dir().join(format!("{}.json", id.as_str()))
    }

    fn collection_path(&self, user: &UserId) -> PathBuf {
        self.collections_dir()
            .join(format!("{}.json", user.as_str()))
    }

    fn lock_path(&self) -> PathBuf {
        self.root.join("store.lock")
    }

    /// Run `f` while holding the store lock.
    fn with_lock<T>(&self, f: impl FnOnce() -> Result<T>) -> Result<T> {
        fs::create_dir_all(&self.root)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;

        lock_file.lock_exclusive()?;
        let result = f();
        lock_file.unlock()?;

        result
    }

    /// The user's rows. A row owned by anyone else means the document is
    /// not this user's, so it is reported as corrupt rather than served.
    fn load_entries(&self, user: &UserId) -> Result<Vec<CollectionEntry>> {
        let path = self.collection_path(user);
        let entries: Vec<CollectionEntry> = read_json(&path)?.unwrap_or_default();

        if let Some(foreign) = entries.iter().find(|e| e.user_id != *user) {
            return Err(StorageError::Corrupt {
                path: path.display().to_string(),
                message: format!("entry {} belongs to {}", foreign.id, foreign.user_id),
            }
            .into());
        }

        Ok(entries)
    }

    fn save_entries(&self, user: &UserId, entries: &[CollectionEntry]) -> Result<()> {
        write_json(&self.collection_path(user), &entries)
    }

    fn load_card(&self, id: &ScryfallId) -> Result<Option<CardRecord>> {
        read_json(&self.card_path(id))
    }

    /// The user's entries joined with their cached cards and filtered.
    ///
    /// Entries whose card is not cached are dropped.
    fn joined(&self, user: &UserId, filter: &CollectionFilter) -> Result<Vec<CollectionItem>> {
        let entries = self.load_entries(user)?;
        let mut cards: HashMap<ScryfallId, Option<CardRecord>> = HashMap::new();
        let mut items = Vec::new();

        for entry in entries {
            if !cards.contains_key(&entry.scryfall_id) {
                let card = self.load_card(&entry.scryfall_id)?;
                cards.insert(entry.scryfall_id.clone(), card);
            }
            let Some(Some(card)) = cards.get(&entry.scryfall_id) else {
                trace!(scryfall_id = %entry.scryfall_id, "entry without cached card");
                continue;
            };
            if filter.matches(&entry, card) {
                items.push(CollectionItem {
                    card: card.clone(),
                    entry,
                });
            }
        }

        Ok(items)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    serde_json::from_str(&content).map(Some).map_err(|e| {
        StorageError::Corrupt {
            path: path.display().to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(value).map_err(StorageError::from)?;

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

fn entry_not_found(id: Uuid) -> Error {
    NotFoundError::Entry { id: id.to_string() }.into()
}

// ============================================================================
// Card Cache
// ============================================================================

#[async_trait]
impl CardCache for FileStore {
    async fn get_card(&self, id: &ScryfallId) -> Result<Option<CardRecord>> {
        self.load_card(id)
    }

    #[instrument(skip(self, record), fields(scryfall_id = %record.scryfall_id))]
    async fn upsert_card(&self, record: &CardRecord) -> Result<()> {
        self.with_lock(|| {
            let path = self.card_path(&record.scryfall_id);
            let mut record = record.clone();
            if let Some(existing) = read_json::<CardRecord>(&path)? {
                record.cached_at = existing.cached_at;
            }
            write_json(&path, &record)?;
            debug!("cached card");
            Ok(())
        })
    }
}

// ============================================================================
// Collection Store
// ============================================================================

#[async_trait]
impl CollectionStore for FileStore {
    #[instrument(skip(self, new), fields(scryfall_id = %new.scryfall_id))]
    async fn add_entry(&self, user: &UserId, new: NewCollectionEntry) -> Result<AddOutcome> {
        self.with_lock(|| {
            let mut entries = self.load_entries(user)?;
            let now = Utc::now();

            let outcome = match entries
                .iter_mut()
                .find(|e| e.same_key(&new.scryfall_id, new.condition, new.foil))
            {
                Some(existing) => {
                    existing.merge(&new, now);
                    AddOutcome {
                        entry: existing.clone(),
                        merged: true,
                    }
                }
                None => {
                    let entry = CollectionEntry::new(user, new, now);
                    entries.push(entry.clone());
                    AddOutcome {
                        entry,
                        merged: false,
                    }
                }
            };

            self.save_entries(user, &entries)?;
            debug!(
                entry_id = %outcome.entry.id,
                quantity = outcome.entry.quantity,
                merged = outcome.merged,
                "added to collection"
            );
            Ok(outcome)
        })
    }

    #[instrument(skip(self, update))]
    async fn update_entry(
        &self,
        user: &UserId,
        id: Uuid,
        update: EntryUpdate,
    ) -> Result<CollectionEntry> {
        self.with_lock(|| {
            let mut entries = self.load_entries(user)?;
            let index = entries
                .iter()
                .position(|e| e.id == id)
                .ok_or_else(|| entry_not_found(id))?;

            let mut updated = entries[index].clone();
            updated.apply(&update, Utc::now());

            let collides = entries.iter().any(|e| {
                e.id != id && e.same_key(&updated.scryfall_id, updated.condition, updated.foil)
            });
            if collides {
                return Err(Error::invalid(
                    "condition",
                    "another entry already holds this card in the same condition and finish",
                ));
            }

            entries[index] = updated.clone();
            self.save_entries(user, &entries)?;
            debug!("updated collection entry");
            Ok(updated)
        })
    }

    #[instrument(skip(self))]
    async fn remove_entry(&self, user: &UserId, id: Uuid) -> Result<()> {
        self.with_lock(|| {
            let mut entries = self.load_entries(user)?;
            let before = entries.len();
            entries.retain(|e| e.id != id);
            if entries.len() == before {
                return Err(entry_not_found(id));
            }
            self.save_entries(user, &entries)?;
            debug!("removed collection entry");
            Ok(())
        })
    }

    async fn owned_quantity(&self, user: &UserId, id: &ScryfallId) -> Result<Option<u32>> {
        let entries = self.load_entries(user)?;
        let mut rows = entries.iter().filter(|e| &e.scryfall_id == id).peekable();
        if rows.peek().is_none() {
            return Ok(None);
        }
        Ok(Some(
            rows.fold(0u32, |total, e| total.saturating_add(e.quantity)),
        ))
    }

    #[instrument(skip(self, filter, sort))]
    async fn fetch_page(
        &self,
        user: &UserId,
        filter: &CollectionFilter,
        sort: &Sort,
        window: Window,
    ) -> Result<Vec<CollectionItem>> {
        let mut items = self.joined(user, filter)?;
        items.sort_by(|a, b| sort.compare(a, b));
        Ok(window.apply(items))
    }

    async fn count(&self, user: &UserId, filter: &CollectionFilter) -> Result<u64> {
        Ok(self.joined(user, filter)?.len() as u64)
    }
}
