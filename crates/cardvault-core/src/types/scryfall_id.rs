//! Scryfall card identifier type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Identifier of a card in the external card database.
///
/// Scryfall issues UUIDs, but the type only requires a short token of ASCII
/// alphanumerics and hyphens so it stays safe to embed in URLs and file names.
///
/// # Example
///
/// ```
/// use cardvault_core::ScryfallId;
///
/// let id = ScryfallId::new("E3285E6B-3E79-4D7C-BF96-D920F973B122").unwrap();
/// assert_eq!(id.as_str(), "e3285e6b-3e79-4d7c-bf96-d920f973b122");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScryfallId(String);

impl ScryfallId {
    const MAX_LEN: usize = 64;

    /// Create a new identifier, normalised to lowercase.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty, overlong or non-token input.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref().trim();
        if s.is_empty() {
            return Err(Error::invalid("scryfall_id", "must not be empty"));
        }
        if s.len() > Self::MAX_LEN {
            return Err(Error::invalid(
                "scryfall_id",
                format!("must be at most {} characters", Self::MAX_LEN),
            ));
        }
        if !s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::invalid(
                "scryfall_id",
                "must contain only letters, digits and '-'",
            ));
        }
        Ok(Self(s.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScryfallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ScryfallId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ScryfallId {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<ScryfallId> for String {
    fn from(id: ScryfallId) -> Self {
        id.0
    }
}
