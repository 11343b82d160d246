//! Scryfall-backed implementation of [`CardSearch`].

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use cardvault_core::card::{Card, CardSet};
use cardvault_core::error::{Error, NotFoundError, UpstreamError};
use cardvault_core::filter::SearchFilterSpec;
use cardvault_core::search::{SearchOptions, SearchPage};
use cardvault_core::traits::CardSearch;
use cardvault_core::types::{ScryfallId, SetCode};
use cardvault_core::Result;

use crate::api_url::ApiUrl;
use crate::client::FetchClient;
use crate::endpoints::*;
use crate::query::compile_query;

/// Card search against the Scryfall API.
#[derive(Debug, Clone)]
pub struct ScryfallGateway {
    base: ApiUrl,
    fetch: FetchClient,
}

impl ScryfallGateway {
    pub fn new(base: ApiUrl, fetch: FetchClient) -> Self {
        Self { base, fetch }
    }

    /// Gateway with a default [`FetchClient`].
    pub fn with_defaults(base: ApiUrl) -> Result<Self> {
        Ok(Self::new(base, FetchClient::with_defaults()?))
    }

    pub fn base(&self) -> &ApiUrl {
        &self.base
    }

    async fn named(&self, query: &NamedQuery<'_>, label: &str) -> Result<Card> {
        let url = self.base.endpoint(CARDS_NAMED);
        self.fetch
            .get_json_query(&url, query)
            .await
            .map_err(|e| lookup_error(e, label))
    }
}

/// Surface the API's own detail message for status errors that carry one.
fn api_error(err: Error) -> Error {
    match err {
        Error::Upstream(UpstreamError::Status {
            code: Some(code),
            details: Some(details),
            ..
        }) => UpstreamError::Api { code, details }.into(),
        other => other,
    }
}

/// Map "no match" answers of single-card lookups to [`NotFoundError`].
fn lookup_error(err: Error, query: &str) -> Error {
    match err {
        Error::Upstream(e) if e.is_not_found() => NotFoundError::Card {
            query: query.to_string(),
        }
        .into(),
        other => api_error(other),
    }
}

#[async_trait]
impl CardSearch for ScryfallGateway {
    #[instrument(skip(self, options), fields(api = %self.base))]
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<SearchPage<Card>> {
        let url = self.base.endpoint(CARDS_SEARCH);
        let params = SearchQuery {
            q: query,
            unique: options.unique.as_str(),
            page: options.page.max(1),
            include_extras: options.include_extras,
            include_multilingual: options.include_multilingual,
        };

        match self
            .fetch
            .get_json_query::<_, ListResponse<Card>>(&url, &params)
            .await
        {
            Ok(list) => {
                let page = list.into_page();
                debug!(total = page.total_cards, returned = page.data.len(), "search results");
                Ok(page)
            }
            Err(Error::Upstream(e)) if e.code() == Some("not_found") => {
                debug!("no cards matched");
                Ok(SearchPage::empty())
            }
            Err(e) => Err(api_error(e)),
        }
    }

    #[instrument(skip(self))]
    async fn autocomplete(&self, query: &str) -> Vec<String> {
        let url = self.base.endpoint(CARDS_AUTOCOMPLETE);
        match self
            .fetch
            .get_json_query::<_, Catalog>(&url, &AutocompleteQuery { q: query })
            .await
        {
            Ok(catalog) => catalog.data,
            Err(e) => {
                warn!(error = %e, "autocomplete failed");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_card(&self, id: &ScryfallId) -> Result<Card> {
        let url = self.base.endpoint(&card_path(id.as_str()));
        self.fetch
            .get_json(&url)
            .await
            .map_err(|e| lookup_error(e, id.as_str()))
    }

    #[instrument(skip(self))]
    async fn get_card_by_name(&self, name: &str, set: Option<&SetCode>) -> Result<Card> {
        let query = NamedQuery {
            exact: Some(name),
            fuzzy: None,
            set: set.map(SetCode::as_str),
        };
        self.named(&query, name).await
    }

    #[instrument(skip(self))]
    async fn get_card_by_fuzzy_name(&self, name: &str) -> Result<Card> {
        let query = NamedQuery {
            exact: None,
            fuzzy: Some(name),
            set: None,
        };
        self.named(&query, name).await
    }

    #[instrument(skip(self, filters, options))]
    async fn advanced_search(
        &self,
        filters: &SearchFilterSpec,
        options: &SearchOptions,
    ) -> Result<SearchPage<Card>> {
        let query = compile_query(filters);
        debug!(%query, "compiled filters");
        self.search(&query, options).await
    }

    #[instrument(skip(self))]
    async fn download_image(&self, url: &str) -> Result<Vec<u8>> {
        self.fetch.get_bytes(url).await
    }

    #[instrument(skip(self))]
    async fn sets(&self) -> Result<Vec<CardSet>> {
        let url = self.base.endpoint(SETS);
        let list: ListResponse<CardSet> = self.fetch.get_json(&url).await.map_err(api_error)?;
        Ok(list.data)
    }
}
