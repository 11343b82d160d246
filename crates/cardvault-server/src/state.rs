//! Shared request state.

use std::collections::HashMap;
use std::sync::Arc;

use cardvault_core::{CardCache, CardSearch, CollectionStore, UserId};

/// A backend serving both the card cache and collections.
pub trait Storage: CardCache + CollectionStore {}

impl<T: CardCache + CollectionStore> Storage for T {}

/// Bearer token to user id.
pub type TokenMap = HashMap<String, UserId>;

#[derive(Clone)]
pub struct AppState {
    pub search: Arc<dyn CardSearch>,
    pub storage: Arc<dyn Storage>,
    pub tokens: Arc<TokenMap>,
}

impl AppState {
    pub fn new(
        search: Arc<dyn CardSearch>,
        storage: Arc<dyn Storage>,
        tokens: TokenMap,
    ) -> Self {
        Self {
            search,
            storage,
            tokens: Arc::new(tokens),
        }
    }

    /// User owning `token`, if any.
    pub fn user_for(&self, token: &str) -> Option<&UserId> {
        self.tokens.get(token)
    }
}
