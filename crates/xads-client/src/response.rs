//! Response envelope decoding.
//!
//! Ads API responses are JSON objects with a top-level `data` field and,
//! for list endpoints, an optional `next_cursor`. Error responses carry an
//! `errors[]` array whose entries have a code and a message. The companion
//! public API uses numeric error codes where the Ads API uses symbolic
//! ones, so the code is a tagged scalar rather than a bare string.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{AdsError, AdsResult};

/// One entry of a response `errors[]` array, surfaced verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorItem {
    /// Symbolic (Ads API) or numeric (public API) error code.
    #[serde(default)]
    pub code: Option<ErrorCode>,

    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,

    /// Offending parameter, when the API names one.
    #[serde(default)]
    pub parameter: Option<String>,
}

impl std::fmt::Display for ApiErrorItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => write!(f, "{code}: {message}"),
            (Some(code), None) => write!(f, "{code}"),
            (None, Some(message)) => write!(f, "{message}"),
            (None, None) => write!(f, "unspecified error"),
        }?;
        if let Some(parameter) = &self.parameter {
            write!(f, " (parameter: {parameter})")?;
        }
        Ok(())
    }
}

/// Error code: symbolic string or numeric, depending on the host.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ErrorCode {
    /// Numeric code (public API v1.1 style).
    Code(i64),
    /// Symbolic code (Ads API style).
    Name(String),
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

/// Raw decoded body shape shared by every Ads API endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub data: Option<Value>,

    #[serde(default)]
    pub next_cursor: Option<String>,

    #[serde(default)]
    pub errors: Vec<ApiErrorItem>,
}

/// One decoded response: body fields plus the originating HTTP status.
/// Owned transiently by the caller.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status of the attempt that produced this body.
    pub status: u16,

    /// Top-level `data` value, if any.
    pub data: Option<Value>,

    /// Cursor naming the next page; absent or empty on the last page.
    pub next_cursor: Option<String>,

    /// Partial-failure errors returned alongside data.
    pub errors: Vec<ApiErrorItem>,
}

impl ApiResponse {
    pub(crate) fn from_envelope(status: u16, envelope: Envelope) -> Self {
        Self {
            status,
            data: envelope.data,
            next_cursor: envelope.next_cursor,
            errors: envelope.errors,
        }
    }

    /// Deserialize `data` into a concrete type.
    pub fn data_as<T: serde::de::DeserializeOwned>(&self) -> AdsResult<T> {
        let data = self.data.clone().unwrap_or(Value::Null);
        serde_json::from_value(data).map_err(AdsError::from)
    }

    /// `data` as a list of items: an array yields its elements in order,
    /// a single object yields itself, null yields nothing. Some create
    /// endpoints return one object or an array depending on input size.
    #[must_use]
    pub fn items(&self) -> Vec<Value> {
        match &self.data {
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => vec![other.clone()],
        }
    }

    /// True when the cursor names another page.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        match self.next_cursor.as_deref() {
            // "0" is the historical last-page marker on some v1 endpoints.
            None | Some("" | "0") => false,
            Some(_) => true,
        }
    }
}
