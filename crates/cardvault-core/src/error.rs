//! Error types for cardvault.
//!
//! This module provides a unified error type with explicit variants for
//! input validation, authorization, missing resources, upstream API failures
//! and storage failures. Each variant maps onto one HTTP status class.

use std::fmt;
use thiserror::Error;

/// The unified error type for cardvault operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed caller input.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Missing or invalid credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),

    /// A card or collection entry does not exist.
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// Failures talking to the external card API.
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Failures reading or writing persisted state.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// HTTP status code this error is surfaced as.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::Unauthorized(_) => 401,
            Error::NotFound(_) => 404,
            Error::Upstream(_) | Error::Storage(_) => 500,
        }
    }

    /// Shorthand for a single-field validation error.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation(ValidationError::single(field, message))
    }
}

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: String,
    /// Human readable reason.
    pub message: String,
}

/// Input validation errors with per-field detail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub details: Vec<FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.push(field, message);
        err
    }

    /// Record a rejected field.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.details.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.details.is_empty()
    }

    /// Returns `Ok(value)` when no field was rejected.
    pub fn finish<T>(self, value: T) -> Result<T, Error> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(Error::Validation(self))
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, detail) in self.details.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", detail.field, detail.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Authorization errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token was presented.
    #[error("missing credentials")]
    MissingCredentials,

    /// The presented token does not map to a user.
    #[error("invalid credentials")]
    InvalidCredentials,
}

/// Missing resources.
#[derive(Debug, Error)]
pub enum NotFoundError {
    /// The card API has no card matching the lookup.
    #[error("no card matches '{query}'")]
    Card { query: String },

    /// The collection entry does not exist for this user.
    #[error("collection entry {id} not found")]
    Entry { id: String },
}

/// Failures of the external card API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network transport failure (DNS, TLS, connection, timeout).
    #[error("transport error: {message}")]
    Transport { message: String },

    /// Non-2xx status other than a retried 429.
    #[error("HTTP {status} {status_text}{}", format_api_detail(.code, .details))]
    Status {
        status: u16,
        status_text: String,
        code: Option<String>,
        details: Option<String>,
    },

    /// The API kept answering 429 after the retry budget was spent.
    #[error("rate limited after {attempts} attempts")]
    RateLimited { attempts: u32 },

    /// The API answered 2xx with an error object.
    #[error("{details}")]
    Api { code: String, details: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {message}")]
    Decode { message: String },
}

impl UpstreamError {
    /// API error code carried by the response, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            UpstreamError::Status { code, .. } => code.as_deref(),
            UpstreamError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True when the API reported that nothing matched.
    pub fn is_not_found(&self) -> bool {
        self.code() == Some("not_found")
            || matches!(self, UpstreamError::Status { status: 404, .. })
    }
}

fn format_api_detail(code: &Option<String>, details: &Option<String>) -> String {
    let mut out = String::new();
    if let Some(code) = code {
        out.push_str(&format!(" [{}]", code));
    }
    if let Some(details) = details {
        out.push_str(&format!(": {}", details));
    }
    out
}

/// Persisted state failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt document {path}: {message}")]
    Corrupt { path: String, message: String },

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(StorageError::Io(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(Error::invalid("q", "required").status_code(), 400);
        assert_eq!(
            Error::from(AuthError::MissingCredentials).status_code(),
            401
        );
        assert_eq!(
            Error::from(NotFoundError::Card {
                query: "x".to_string()
            })
            .status_code(),
            404
        );
        assert_eq!(
            Error::from(UpstreamError::RateLimited { attempts: 2 }).status_code(),
            500
        );
    }

    #[test]
    fn validation_display_lists_fields() {
        let mut err = ValidationError::new();
        err.push("quantity", "must be at least 1");
        err.push("condition", "unknown grade");
        assert_eq!(
            err.to_string(),
            "quantity: must be at least 1; condition: unknown grade"
        );
    }

    #[test]
    fn status_error_display_includes_api_detail() {
        let err = UpstreamError::Status {
            status: 400,
            status_text: "Bad Request".to_string(),
            code: Some("bad_request".to_string()),
            details: Some("query too short".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 400 Bad Request [bad_request]: query too short"
        );
    }

    #[test]
    fn not_found_detection() {
        let err = UpstreamError::Api {
            code: "not_found".to_string(),
            details: "no cards".to_string(),
        };
        assert!(err.is_not_found());
        assert!(!UpstreamError::RateLimited { attempts: 2 }.is_not_found());
    }
}
