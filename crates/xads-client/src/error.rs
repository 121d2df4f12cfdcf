//! Client error taxonomy.
//!
//! Retryable errors (`Http`, `RateLimited`, 5xx `Api`) are absorbed by the
//! dispatch loop up to its bound; everything else propagates unchanged to
//! the calling command, which owns user-facing presentation.

use std::time::Duration;

use crate::response::ApiErrorItem;

/// Errors from the Ads API client.
#[derive(Debug, thiserror::Error)]
pub enum AdsError {
    /// OAuth signing failed; programmer error, never retried.
    #[error("request signing failed: {0}")]
    Signing(#[from] xads_oauth::OauthError),

    /// Connection-level failure (timeout, reset, DNS). Retried like 5xx.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expect.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Credentials were rejected (401). Terminal; re-run the auth flow.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The API rejected the request (4xx other than 401/429). Carries the
    /// response `errors[]` verbatim; never retried.
    #[error("Ads API error ({status}): {}", format_errors(.errors))]
    Api {
        status: u16,
        errors: Vec<ApiErrorItem>,
    },

    /// Rate limited (429). Retried honoring the server-suggested wait.
    #[error("rate limited{}", .retry_after.map(|d| format!(", retry after {}s", d.as_secs())).unwrap_or_default())]
    RateLimited { retry_after: Option<Duration> },

    /// A retryable error persisted through every allowed attempt.
    /// Distinct from a genuine remote rejection: the last error was
    /// transient, we just gave up.
    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<AdsError>,
    },

    /// The cursor loop exceeded its page ceiling.
    #[error("pagination did not terminate after {pages} pages")]
    PaginationOverflow { pages: u32 },

    /// Media finalize or processing reported failure.
    #[error("media upload failed: {reason}")]
    Upload { reason: String },

    /// The caller's cancellation signal fired.
    #[error("operation cancelled")]
    Cancelled,

    /// Client misconfiguration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl AdsError {
    /// Whether the dispatch loop may retry this error.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Server-suggested delay before the next attempt, if any.
    #[must_use]
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

fn format_errors(errors: &[ApiErrorItem]) -> String {
    if errors.is_empty() {
        return "no error detail".to_string();
    }
    errors
        .iter()
        .map(ApiErrorItem::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result type for client operations.
pub type AdsResult<T> = Result<T, AdsError>;
