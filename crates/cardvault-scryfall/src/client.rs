//! Rate-limited HTTP client for the card API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace, warn};

use cardvault_core::Result;
use cardvault_core::error::{Error, UpstreamError};

use crate::endpoints::{ApiError, ApiResponse};
use crate::rate_limit::{RateLimiter, RetryPolicy};

/// HTTP client whose every request passes through a shared [`RateLimiter`].
///
/// A 429 answer is retried after the policy backoff until
/// `max_attempts` is spent. Any other non-2xx answer fails at once with the
/// status, its reason phrase and the API error body when there is one.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: reqwest::Client,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
}

impl FetchClient {
    /// Create a client sharing `limiter`.
    pub fn new(limiter: Arc<RateLimiter>, retry: RetryPolicy, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .user_agent(concat!("cardvault/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(map_reqwest)?;

        Ok(Self {
            client,
            limiter,
            retry,
        })
    }

    /// Client with the default limiter, retry policy and a 30 second timeout.
    pub fn with_defaults() -> Result<Self> {
        Self::new(
            Arc::new(RateLimiter::default()),
            RetryPolicy::default(),
            Duration::from_secs(30),
        )
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// GET `url`.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<Response> {
        self.dispatch(url, || self.client.get(url)).await
    }

    /// GET `url` with query parameters.
    #[instrument(skip(self))]
    pub async fn fetch_query<Q>(&self, url: &str, query: &Q) -> Result<Response>
    where
        Q: Serialize + std::fmt::Debug + ?Sized,
    {
        trace!(?query, "query parameters");
        self.dispatch(url, || self.client.get(url).query(query))
            .await
    }

    /// GET `url` and decode a JSON payload.
    pub async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R> {
        let response = self.fetch(url).await?;
        decode(response).await
    }

    /// GET `url` with query parameters and decode a JSON payload.
    pub async fn get_json_query<Q, R>(&self, url: &str, query: &Q) -> Result<R>
    where
        Q: Serialize + std::fmt::Debug + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.fetch_query(url, query).await?;
        decode(response).await
    }

    /// GET `url` and return the raw body, accepting any content type.
    #[instrument(skip(self))]
    pub async fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .dispatch(url, || self.client.get(url).header(ACCEPT, "*/*"))
            .await?;
        let bytes = response.bytes().await.map_err(map_reqwest)?;
        Ok(bytes.to_vec())
    }

    async fn dispatch<F>(&self, url: &str, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 1;
        loop {
            self.limiter.acquire().await;
            debug!(url, attempt, "dispatching request");

            let response = build().send().await.map_err(map_reqwest)?;
            let status = response.status();
            trace!(status = %status, "response");

            if status.is_success() {
                return Ok(response);
            }

            if status != StatusCode::TOO_MANY_REQUESTS {
                return Err(status_error(response).await);
            }

            if attempt >= self.retry.max_attempts {
                warn!(url, attempt, "rate limited, giving up");
                return Err(UpstreamError::RateLimited { attempts: attempt }.into());
            }

            warn!(
                url,
                attempt,
                backoff_ms = self.retry.backoff.as_millis() as u64,
                "rate limited, backing off"
            );
            tokio::time::sleep(self.retry.backoff).await;
            attempt += 1;
        }
    }
}

/// Decode a 2xx body that may still be an API error object.
async fn decode<R: DeserializeOwned>(response: Response) -> Result<R> {
    let body = response.bytes().await.map_err(map_reqwest)?;
    let parsed: ApiResponse<R> =
        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode {
            message: e.to_string(),
        })?;

    match parsed {
        ApiResponse::Ok(value) => Ok(value),
        ApiResponse::Error(e) => Err(UpstreamError::Api {
            code: e.code,
            details: e.details,
        }
        .into()),
    }
}

/// Build the error for a non-2xx, non-429 response.
async fn status_error(response: Response) -> Error {
    let status = response.status();
    let status_text = status.canonical_reason().unwrap_or_default().to_string();
    let body = response.json::<ApiError>().await.ok();

    UpstreamError::Status {
        status: status.as_u16(),
        status_text,
        code: body.as_ref().map(|b| b.code.clone()),
        details: body.map(|b| b.details),
    }
    .into()
}

pub(crate) fn map_reqwest(err: reqwest::Error) -> Error {
    let message = if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    };

    if err.is_decode() {
        UpstreamError::Decode { message }.into()
    } else {
        UpstreamError::Transport { message }.into()
    }
}
