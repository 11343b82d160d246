//! Scryfall endpoint definitions and wire types.

use serde::{Deserialize, Serialize};

use cardvault_core::SearchPage;

// ============================================================================
// Endpoint Paths
// ============================================================================

pub const CARDS_SEARCH: &str = "cards/search";

pub const CARDS_AUTOCOMPLETE: &str = "cards/autocomplete";

pub const CARDS_NAMED: &str = "cards/named";

pub const SETS: &str = "sets";

/// Path of a single card by id.
pub fn card_path(id: &str) -> String {
    format!("cards/{}", id)
}

// ============================================================================
// Query Types
// ============================================================================

/// Query parameters for cards/search.
#[derive(Debug, Serialize)]
pub struct SearchQuery<'a> {
    pub q: &'a str,
    pub unique: &'a str,
    pub page: u32,
    pub include_extras: bool,
    pub include_multilingual: bool,
}

/// Query parameters for cards/autocomplete.
#[derive(Debug, Serialize)]
pub struct AutocompleteQuery<'a> {
    pub q: &'a str,
}

/// Query parameters for cards/named.
#[derive(Debug, Serialize)]
pub struct NamedQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuzzy: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<&'a str>,
}

// ============================================================================
// Response Types
// ============================================================================

/// A paginated list object.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub total_cards: Option<u64>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn into_page(self) -> SearchPage<T> {
        SearchPage {
            total_cards: self.total_cards.unwrap_or(self.data.len() as u64),
            has_more: self.has_more,
            next_page: self.next_page,
            data: self.data,
        }
    }
}

/// A catalog object (list of strings).
#[derive(Debug, Deserialize)]
pub struct Catalog {
    pub data: Vec<String>,
}

/// Marker matching `"object": "error"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ErrorObject {
    #[serde(rename = "error")]
    Error,
}

/// Scryfall error object.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    #[allow(dead_code)]
    pub object: ErrorObject,
    pub code: String,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub details: String,
}

/// Any Scryfall response: an error object or the expected payload.
///
/// The error arm only matches bodies whose `object` is `"error"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Error(ApiError),
    Ok(T),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_object_is_recognised() {
        let response: ApiResponse<Catalog> = serde_json::from_value(json!({
            "object": "error",
            "code": "not_found",
            "status": 404,
            "details": "No cards found matching your query."
        }))
        .unwrap();
        match response {
            ApiResponse::Error(e) => {
                assert_eq!(e.code, "not_found");
                assert_eq!(e.status, Some(404));
            }
            ApiResponse::Ok(_) => panic!("expected error arm"),
        }
    }

    #[test]
    fn payload_is_not_mistaken_for_error() {
        let response: ApiResponse<Catalog> = serde_json::from_value(json!({
            "object": "catalog",
            "total_values": 1,
            "data": ["Lightning Bolt"]
        }))
        .unwrap();
        assert!(matches!(response, ApiResponse::Ok(c) if c.data == vec!["Lightning Bolt"]));
    }

    #[test]
    fn list_without_total_uses_length() {
        let list: ListResponse<String> =
            serde_json::from_value(json!({ "object": "list", "has_more": false, "data": ["a", "b"] }))
                .unwrap();
        let page = list.into_page();
        assert_eq!(page.total_cards, 2);
        assert!(!page.has_more);
    }
}
