//! Collection handlers.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use tracing::instrument;
use uuid::Uuid;

use cardvault_core::collection::{
    AddEntryRequest, AddOutcome, CollectionEntry, CollectionPage, CollectionParams,
    CollectionQuery, CollectionStats, UpdateEntryRequest, add_card, collection_stats,
    search_collection,
};
use cardvault_core::{CollectionStore, Error};

use super::{body_error, query_error};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

fn entry_id(raw: &str) -> Result<Uuid, Error> {
    Uuid::parse_str(raw).map_err(|_| Error::invalid("id", "is not a valid entry id"))
}

/// `GET /api/collection/search`
#[instrument(skip(state, user, params), fields(user = %user.0))]
pub async fn search(
    State(state): State<AppState>,
    user: AuthUser,
    params: Result<Query<CollectionParams>, QueryRejection>,
) -> Result<Json<CollectionPage>, ApiError> {
    let Query(params) = params.map_err(query_error)?;
    let query = CollectionQuery::from_params(&params)?;
    let page = search_collection(&*state.storage, &user.0, &query).await?;
    Ok(Json(page))
}

/// `POST /api/collection/add`
///
/// Caches the card first when it is not cached yet, so every row refers to
/// a cached card. Answers 201 for a new row and 200 when copies were merged
/// into an existing one.
#[instrument(skip(state, user, body), fields(user = %user.0))]
pub async fn add(
    State(state): State<AppState>,
    user: AuthUser,
    body: Result<Json<AddEntryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AddOutcome>), ApiError> {
    let Json(request) = body.map_err(body_error)?;
    let new = request.validate()?;
    let outcome = add_card(&*state.search, &*state.storage, &user.0, new).await?;
    let status = if outcome.merged {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(outcome)))
}

/// `PATCH /api/collection/:id`
#[instrument(skip(state, user, body), fields(user = %user.0))]
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<UpdateEntryRequest>, JsonRejection>,
) -> Result<Json<CollectionEntry>, ApiError> {
    let id = entry_id(&id)?;
    let Json(request) = body.map_err(body_error)?;
    let update = request.validate()?;
    let entry = state.storage.update_entry(&user.0, id, update).await?;
    Ok(Json(entry))
}

/// `DELETE /api/collection/:id`
#[instrument(skip(state, user), fields(user = %user.0))]
pub async fn remove(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = entry_id(&id)?;
    state.storage.remove_entry(&user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /api/collection/stats`
#[instrument(skip(state, user), fields(user = %user.0))]
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<CollectionStats>, ApiError> {
    Ok(Json(collection_stats(&*state.storage, &user.0).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_validation() {
        let id = Uuid::new_v4();
        assert_eq!(entry_id(&id.to_string()).unwrap(), id);
        assert_eq!(entry_id("not-a-uuid").unwrap_err().status_code(), 400);
    }
}
