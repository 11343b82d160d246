//! User collections: entries, browse queries and statistics.

mod add;
mod entry;
mod query;
mod stats;

pub use add::add_card;
pub use entry::{
    AddEntryRequest, AddOutcome, CollectionEntry, EntryUpdate, MAX_NOTES_LEN, MAX_QUANTITY,
    NewCollectionEntry, UpdateEntryRequest,
};
pub use query::{
    CollectionFilter, CollectionItem, CollectionPage, CollectionParams, CollectionQuery,
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PageRequest, Sort, SortDirection, SortKey, Window,
    search_collection,
};
pub use stats::{CollectionStats, collection_stats};
