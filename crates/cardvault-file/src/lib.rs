//! cardvault-file - Filesystem-backed card cache and collection store.
//!
//! Cards and collections are stored as JSON documents under one root
//! directory. Read-modify-write cycles are serialised with an exclusive lock
//! on a lock file, and every document is replaced atomically through a
//! temporary file.

mod store;

pub use store::FileStore;
