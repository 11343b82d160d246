//! Card search and lookup handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use cardvault_core::error::ValidationError;
use cardvault_core::{
    EnrichPipeline, EnrichedCard, ScryfallId, SearchFilterSpec, SearchOptions,
    SearchPage, UniqueMode,
};

use super::{body_error, query_error};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    q: Option<String>,
    page: Option<String>,
    unique: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AutocompleteParams {
    q: Option<String>,
}

/// Page and unique mode shared by both search routes.
fn search_options(params: &SearchParams, errors: &mut ValidationError) -> SearchOptions {
    let mut options = SearchOptions::default();

    if let Some(raw) = params.page.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
        match raw.parse::<u32>() {
            Ok(page) if page >= 1 => options.page = page,
            _ => errors.push("page", "must be a positive integer"),
        }
    }

    if let Some(raw) = params.unique.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
        match raw.parse::<UniqueMode>() {
            Ok(unique) => options.unique = unique,
            Err(_) => errors.push("unique", "must be one of cards, art, prints"),
        }
    }

    options
}

/// `GET /api/cards/search`
#[instrument(skip(state, user, params), fields(user = %user.0))]
pub async fn search(
    State(state): State<AppState>,
    user: AuthUser,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchPage<EnrichedCard>>, ApiError> {
    let Query(params) = params.map_err(query_error)?;

    let mut errors = ValidationError::new();
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string);
    if query.is_none() {
        errors.push("q", "is required");
    }
    let options = search_options(&params, &mut errors);
    let query = errors.finish(query)?.unwrap_or_default();

    let page = state.search.search(&query, &options).await?;
    let pipeline = EnrichPipeline::new(&*state.storage, &*state.storage);
    Ok(Json(pipeline.enrich_page(&user.0, page).await))
}

/// `POST /api/cards/advanced`
#[instrument(skip(state, user, params, body), fields(user = %user.0))]
pub async fn advanced(
    State(state): State<AppState>,
    user: AuthUser,
    params: Result<Query<SearchParams>, QueryRejection>,
    body: Result<Json<SearchFilterSpec>, JsonRejection>,
) -> Result<Json<SearchPage<EnrichedCard>>, ApiError> {
    let Query(params) = params.map_err(query_error)?;
    let Json(filters) = body.map_err(body_error)?;

    let mut errors = ValidationError::new();
    if filters.is_empty() {
        errors.push("filters", "at least one filter is required");
    }
    let options = search_options(&params, &mut errors);
    let options = errors.finish(options)?;

    let page = state.search.advanced_search(&filters, &options).await?;
    let pipeline = EnrichPipeline::new(&*state.storage, &*state.storage);
    Ok(Json(pipeline.enrich_page(&user.0, page).await))
}

/// `GET /api/cards/autocomplete`
#[instrument(skip_all)]
pub async fn autocomplete(
    State(state): State<AppState>,
    _user: AuthUser,
    params: Result<Query<AutocompleteParams>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(params) = params.map_err(query_error)?;

    let names = match params.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => state.search.autocomplete(q).await,
        _ => Vec::new(),
    };
    Ok(Json(json!({ "data": names })))
}

/// `GET /api/cards/:id`
///
/// Always fetches the card from the API and refreshes the cache.
#[instrument(skip(state, user), fields(user = %user.0))]
pub async fn get_card(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<EnrichedCard>, ApiError> {
    let id = ScryfallId::new(&id)?;
    let card = state.search.get_card(&id).await?;
    let pipeline = EnrichPipeline::new(&*state.storage, &*state.storage);
    Ok(Json(pipeline.refresh(&user.0, &card).await?))
}

/// `GET /api/sets`
#[instrument(skip_all)]
pub async fn sets(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let sets = state.search.sets().await?;
    Ok(Json(json!({ "data": sets })))
}
