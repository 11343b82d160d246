//! cardvault-server - JSON HTTP API for cardvault.
//!
//! ## Routes
//!
//! Every `/api` route requires `Authorization: Bearer <token>`.
//!
//! - `GET /api/cards/search?q&page&unique` - enriched search page
//! - `POST /api/cards/advanced?page&unique` - enriched search from structured filters
//! - `GET /api/cards/autocomplete?q` - name suggestions
//! - `GET /api/cards/:id` - one enriched card
//! - `GET /api/sets` - printing sets
//! - `GET /api/collection/search` - filtered, sorted, paginated collection
//! - `POST /api/collection/add` - add copies (201 new row, 200 merged)
//! - `PATCH /api/collection/:id`, `DELETE /api/collection/:id`
//! - `GET /api/collection/stats` - aggregate statistics
//! - `GET /health` - `{ "ok": true }`, no auth
//!
//! ## Example
//!
//! ```ignore
//! let state = AppState::new(gateway, store, tokens);
//! cardvault_server::serve(state, "127.0.0.1:3000").await?;
//! ```

mod auth;
mod error;
mod handlers;
mod state;

use axum::Router;
use axum::routing::{get, patch, post};
use tracing::info;

pub use auth::AuthUser;
pub use error::ApiError;
pub use state::{AppState, Storage, TokenMap};

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/cards/search", get(handlers::cards::search))
        .route("/cards/advanced", post(handlers::cards::advanced))
        .route("/cards/autocomplete", get(handlers::cards::autocomplete))
        .route("/cards/:id", get(handlers::cards::get_card))
        .route("/sets", get(handlers::cards::sets))
        .route("/collection/search", get(handlers::collection::search))
        .route("/collection/add", post(handlers::collection::add))
        .route("/collection/stats", get(handlers::collection::stats))
        .route(
            "/collection/:id",
            patch(handlers::collection::update).delete(handlers::collection::remove),
        );

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .with_state(state)
}

/// Serve the API at `addr` (e.g. `"127.0.0.1:3000"`).
pub async fn serve(state: AppState, addr: &str) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state)).await
}
