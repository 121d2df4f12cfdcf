//! OAuth error types.

use crate::store::StoreError;

/// Errors from signing or the three-legged flow.
#[derive(Debug, thiserror::Error)]
pub enum OauthError {
    /// Signature input was malformed. This is a programmer error, not a
    /// runtime condition; callers should not retry it.
    #[error("OAuth signature error: {0}")]
    Signature(String),

    /// The user declined authorization, or the provider rejected the
    /// verifier. Re-running the flow is the only recovery.
    #[error("authorization denied: {0}")]
    Denied(String),

    /// A token endpoint returned a non-success status.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// A token endpoint answered 2xx but the body was missing an
    /// expected `oauth_token`/`oauth_token_secret` field.
    #[error("invalid token response: {0}")]
    InvalidTokenResponse(String),

    /// HTTP transport failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("URL parsing failed: {0}")]
    Url(#[from] url::ParseError),

    /// Credential persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for OAuth operations.
pub type OauthResult<T> = Result<T, OauthError>;
