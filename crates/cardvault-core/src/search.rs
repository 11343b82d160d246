//! Card search options and result pages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// How the card API collapses printings of the same card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniqueMode {
    #[default]
    Cards,
    Art,
    Prints,
}

impl UniqueMode {
    pub fn as_str(self) -> &'static str {
        match self {
            UniqueMode::Cards => "cards",
            UniqueMode::Art => "art",
            UniqueMode::Prints => "prints",
        }
    }
}

impl fmt::Display for UniqueMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UniqueMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cards" => Ok(UniqueMode::Cards),
            "art" => Ok(UniqueMode::Art),
            "prints" => Ok(UniqueMode::Prints),
            other => Err(Error::invalid(
                "unique",
                format!("'{}' is not one of cards, art, prints", other),
            )),
        }
    }
}

/// Options for a card search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub unique: UniqueMode,
    /// 1-based result page.
    pub page: u32,
    pub include_extras: bool,
    pub include_multilingual: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            unique: UniqueMode::Cards,
            page: 1,
            include_extras: false,
            include_multilingual: false,
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage<T> {
    pub total_cards: u64,
    pub has_more: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page: Option<String>,
    pub data: Vec<T>,
}

impl<T> SearchPage<T> {
    /// The page returned when nothing matched.
    pub fn empty() -> Self {
        Self {
            total_cards: 0,
            has_more: false,
            next_page: None,
            data: Vec::new(),
        }
    }

    /// Replace the page items, keeping pagination metadata.
    pub fn with_data<U>(self, data: Vec<U>) -> SearchPage<U> {
        SearchPage {
            total_cards: self.total_cards,
            has_more: self.has_more,
            next_page: self.next_page,
            data,
        }
    }
}
