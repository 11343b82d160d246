//! Collection browse queries.
//!
//! Raw request parameters are validated into a [`CollectionQuery`]. The
//! filter half of the query is a single [`CollectionFilter`] value that is
//! handed unchanged to both [`CollectionStore::fetch_page`] and
//! [`CollectionStore::count`], so the page and the total are computed from
//! the same predicate.
//!
//! [`CollectionStore::fetch_page`]: crate::traits::CollectionStore::fetch_page
//! [`CollectionStore::count`]: crate::traits::CollectionStore::count

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::card::CardRecord;
use crate::error::ValidationError;
use crate::traits::CollectionStore;
use crate::types::{Color, ColorSet, Rarity, SetCode, UserId};

use super::CollectionEntry;

pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Raw query-string parameters of a collection search.
///
/// List parameters are comma separated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollectionParams {
    pub q: Option<String>,
    pub colors: Option<String>,
    pub types: Option<String>,
    pub sets: Option<String>,
    pub cmc_min: Option<String>,
    pub cmc_max: Option<String>,
    pub rarity: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Predicates over a user's collection rows joined with their cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionFilter {
    /// Lowercased substring matched against card name and notes.
    pub q: Option<String>,
    /// Matches cards sharing at least one color.
    pub colors: ColorSet,
    /// Lowercased substrings; any may match the type line.
    pub types: Vec<String>,
    pub sets: Vec<SetCode>,
    pub cmc_min: Option<f64>,
    pub cmc_max: Option<f64>,
    pub rarity: Vec<Rarity>,
}

impl CollectionFilter {
    pub fn matches(&self, entry: &CollectionEntry, card: &CardRecord) -> bool {
        if let Some(q) = &self.q {
            let in_name = card.name.to_lowercase().contains(q);
            let in_notes = entry
                .notes
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(q));
            if !in_name && !in_notes {
                return false;
            }
        }

        if !self.colors.is_empty() {
            let card_colors: ColorSet = card.colors.iter().collect();
            if !card_colors.overlaps(&self.colors) {
                return false;
            }
        }

        if !self.types.is_empty() {
            let type_line = card.type_line.to_lowercase();
            if !self.types.iter().any(|t| type_line.contains(t.as_str())) {
                return false;
            }
        }

        if !self.sets.is_empty() && !self.sets.contains(&card.set_code) {
            return false;
        }

        if self.cmc_min.is_some_and(|min| card.cmc < min) {
            return false;
        }
        if self.cmc_max.is_some_and(|max| card.cmc > max) {
            return false;
        }

        if !self.rarity.is_empty() && !self.rarity.contains(&card.rarity) {
            return false;
        }

        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    Cmc,
    Rarity,
    Set,
    CreatedAt,
}

impl FromStr for SortKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "cmc" | "complexity" => Ok(SortKey::Cmc),
            "rarity" => Ok(SortKey::Rarity),
            "set" => Ok(SortKey::Set),
            "created_at" | "date_added" | "date-added" => Ok(SortKey::CreatedAt),
            other => Err(crate::Error::invalid(
                "sort",
                format!(
                    "'{}' is not one of name, cmc, rarity, set, created_at",
                    other
                ),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(crate::Error::invalid(
                "order",
                format!("'{}' is not one of asc, desc", other),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sort {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Sort {
    /// Total order over joined rows; ties fall back to entry id ascending.
    pub fn compare(&self, a: &CollectionItem, b: &CollectionItem) -> Ordering {
        let primary = match self.key {
            SortKey::Name => a
                .card
                .name
                .to_lowercase()
                .cmp(&b.card.name.to_lowercase()),
            SortKey::Cmc => a.card.cmc.total_cmp(&b.card.cmc),
            SortKey::Rarity => a.card.rarity.rank().cmp(&b.card.rarity.rank()),
            SortKey::Set => a.card.set_code.cmp(&b.card.set_code),
            SortKey::CreatedAt => a.entry.created_at.cmp(&b.entry.created_at),
        };
        let primary = match self.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.entry.id.cmp(&b.entry.id))
    }
}

/// Requested page, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn window(&self) -> Window {
        Window {
            offset: (self.page as usize - 1) * self.limit as usize,
            limit: self.limit as usize,
        }
    }

    pub fn has_more(&self, total: u64) -> bool {
        total > u64::from(self.page) * u64::from(self.limit)
    }
}

/// Offset/limit slice of an ordered result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: usize,
    pub limit: usize,
}

impl Window {
    pub fn all() -> Self {
        Self {
            offset: 0,
            limit: usize::MAX,
        }
    }

    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items.into_iter().skip(self.offset).take(self.limit).collect()
    }
}

/// A validated collection search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionQuery {
    pub filter: CollectionFilter,
    pub sort: Sort,
    pub page: PageRequest,
}

impl CollectionQuery {
    /// Validate raw parameters, collecting every rejected field.
    pub fn from_params(params: &CollectionParams) -> Result<Self> {
        let mut errors = ValidationError::new();

        let q = non_empty(&params.q).map(|q| q.to_lowercase());

        let colors = parse_list::<Color>(&params.colors, "colors", &mut errors)
            .into_iter()
            .collect();

        let types = split_list(&params.types)
            .map(|t| t.to_lowercase())
            .collect();

        let sets = parse_list::<SetCode>(&params.sets, "sets", &mut errors);
        let rarity = parse_list::<Rarity>(&params.rarity, "rarity", &mut errors);

        let cmc_min = parse_cmc(&params.cmc_min, "cmc_min", &mut errors);
        let cmc_max = parse_cmc(&params.cmc_max, "cmc_max", &mut errors);
        if let (Some(min), Some(max)) = (cmc_min, cmc_max)
            && min > max
        {
            errors.push("cmc_min", "must not exceed cmc_max");
        }

        let key = parse_one::<SortKey>(&params.sort, "sort", &mut errors).unwrap_or_default();
        let direction =
            parse_one::<SortDirection>(&params.order, "order", &mut errors).unwrap_or_default();

        let page = match non_empty(&params.page) {
            None => 1,
            Some(raw) => match raw.parse::<u32>() {
                Ok(p) if p >= 1 => p,
                _ => {
                    errors.push("page", "must be a positive integer");
                    1
                }
            },
        };
        let limit = match non_empty(&params.limit) {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => match raw.parse::<u32>() {
                Ok(l) if (1..=MAX_PAGE_SIZE).contains(&l) => l,
                _ => {
                    errors.push(
                        "limit",
                        format!("must be an integer between 1 and {}", MAX_PAGE_SIZE),
                    );
                    DEFAULT_PAGE_SIZE
                }
            },
        };

        errors.finish(Self {
            filter: CollectionFilter {
                q,
                colors,
                types,
                sets,
                cmc_min,
                cmc_max,
                rarity,
            },
            sort: Sort { key, direction },
            page: PageRequest { page, limit },
        })
    }
}

fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn split_list(raw: &Option<String>) -> impl Iterator<Item = &str> {
    raw.as_deref()
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn parse_list<T: FromStr>(
    raw: &Option<String>,
    field: &str,
    errors: &mut ValidationError,
) -> Vec<T> {
    let mut out = Vec::new();
    for item in split_list(raw) {
        match item.parse() {
            Ok(v) => out.push(v),
            Err(_) => errors.push(field, format!("invalid value '{}'", item)),
        }
    }
    out
}

fn parse_one<T: FromStr>(
    raw: &Option<String>,
    field: &str,
    errors: &mut ValidationError,
) -> Option<T> {
    let raw = non_empty(raw)?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(field, format!("invalid value '{}'", raw));
            None
        }
    }
}

fn parse_cmc(raw: &Option<String>, field: &str, errors: &mut ValidationError) -> Option<f64> {
    let raw = non_empty(raw)?;
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Some(v),
        _ => {
            errors.push(field, "must be a non-negative number");
            None
        }
    }
}

/// A collection entry joined with its cached card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionItem {
    #[serde(flatten)]
    pub entry: CollectionEntry,
    pub card: CardRecord,
}

/// One page of a collection search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionPage {
    pub data: Vec<CollectionItem>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// Run a collection search: one windowed fetch and one count, issued
/// concurrently against the same filter.
pub async fn search_collection<S>(
    store: &S,
    user: &UserId,
    query: &CollectionQuery,
) -> Result<CollectionPage>
where
    S: CollectionStore + ?Sized,
{
    let window = query.page.window();
    let (data, total) = tokio::try_join!(
        store.fetch_page(user, &query.filter, &query.sort, window),
        store.count(user, &query.filter),
    )?;

    tracing::debug!(user = %user, total, returned = data.len(), "collection search");

    Ok(CollectionPage {
        has_more: query.page.has_more(total),
        data,
        total,
        page: query.page.page,
        limit: query.page.limit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn params(pairs: &[(&str, &str)]) -> CollectionParams {
        let map: serde_json::Map<String, serde_json::Value> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        serde_json::from_value(serde_json::Value::Object(map)).unwrap()
    }

    #[test]
    fn defaults() {
        let query = CollectionQuery::from_params(&CollectionParams::default()).unwrap();
        assert_eq!(query.page, PageRequest { page: 1, limit: 50 });
        assert_eq!(query.sort, Sort::default());
        assert_eq!(query.filter, CollectionFilter::default());
    }

    #[test]
    fn parses_lists() {
        let query = CollectionQuery::from_params(&params(&[
            ("colors", "R, g"),
            ("types", "Creature,Artifact"),
            ("sets", "DOM,war"),
            ("rarity", "rare,mythic"),
            ("sort", "complexity"),
            ("order", "desc"),
        ]))
        .unwrap();
        assert_eq!(query.filter.colors.letters(), "rg");
        assert_eq!(query.filter.types, vec!["creature", "artifact"]);
        assert_eq!(
            query.filter.sets,
            vec![SetCode::new("dom").unwrap(), SetCode::new("war").unwrap()]
        );
        assert_eq!(query.filter.rarity, vec![Rarity::Rare, Rarity::Mythic]);
        assert_eq!(query.sort.key, SortKey::Cmc);
        assert_eq!(query.sort.direction, SortDirection::Desc);
    }

    #[test]
    fn rejects_bad_fields_with_detail() {
        let err = CollectionQuery::from_params(&params(&[
            ("limit", "101"),
            ("page", "0"),
            ("cmc_min", "5"),
            ("cmc_max", "2"),
            ("sort", "price"),
        ]))
        .unwrap_err();
        let Error::Validation(v) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = v.details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["cmc_min", "sort", "page", "limit"]);
    }

    #[test]
    fn page_math() {
        let page = PageRequest { page: 3, limit: 20 };
        assert_eq!(page.window(), Window { offset: 40, limit: 20 });
        assert!(page.has_more(61));
        assert!(!page.has_more(60));
    }

    #[test]
    fn window_apply() {
        let window = Window { offset: 2, limit: 2 };
        assert_eq!(window.apply(vec![1, 2, 3, 4, 5]), vec![3, 4]);
        assert_eq!(window.apply(vec![1]), Vec::<i32>::new());
        assert_eq!(Window::all().apply(vec![1, 2]), vec![1, 2]);
    }
}
