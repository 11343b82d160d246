//! Mapping of core errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use cardvault_core::Error;

/// A core error rendered as a JSON response.
///
/// Validation errors carry their per-field details. Upstream and storage
/// failures are logged and answered with a generic message.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl<E> From<E> for ApiError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = match &self.0 {
            Error::Validation(v) => json!({
                "error": "validation failed",
                "details": v.details,
            }),
            Error::Unauthorized(e) => json!({ "error": e.to_string() }),
            Error::NotFound(e) => json!({ "error": e.to_string() }),
            Error::Upstream(_) | Error::Storage(_) => {
                error!(error = %self.0, "request failed");
                json!({ "error": "internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}
