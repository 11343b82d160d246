//! Request handlers.

pub mod cards;
pub mod collection;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use serde_json::{Value, json};

use cardvault_core::Error;

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Malformed query strings are validation errors on `query`.
fn query_error(rejection: QueryRejection) -> Error {
    Error::invalid("query", rejection.body_text())
}

/// Malformed bodies are validation errors on `body`.
fn body_error(rejection: JsonRejection) -> Error {
    Error::invalid("body", rejection.body_text())
}
