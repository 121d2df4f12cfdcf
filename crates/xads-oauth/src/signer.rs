//! OAuth 1.0a request signing (RFC 5849, HMAC-SHA1).
//!
//! The Ads API validates signatures bit-for-bit, so the encoding and
//! ordering rules here follow the RFC exactly: RFC 3986 percent-encoding
//! of every key and value, lexicographic ordering of the encoded pairs,
//! and a signing key built from the two percent-encoded secrets.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use url::Url;

use crate::error::{OauthError, OauthResult};
use crate::store::Credentials;

/// Everything except RFC 3986 unreserved characters
/// (ALPHA / DIGIT / "-" / "." / "_" / "~") gets percent-encoded.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A signed request attempt.
///
/// Immutable once built; retries sign again so that every attempt carries
/// a fresh nonce and timestamp.
#[derive(Debug, Clone)]
pub struct SignedRequest {
    /// Value for the `Authorization` header (`OAuth k="v", …`, protocol
    /// parameters only).
    pub authorization: String,
    /// The base64 HMAC-SHA1 signature.
    pub signature: String,
    /// Nonce used for this attempt.
    pub nonce: String,
    /// Unix timestamp (seconds) used for this attempt.
    pub timestamp: u64,
}

/// OAuth 1.0a signer.
///
/// Holds the consumer key pair and, outside the request-token leg of the
/// handshake, a token pair. Signing is a pure function of the request and
/// the (nonce, timestamp) pair; the public entry point randomizes both.
#[derive(Debug, Clone)]
pub struct OAuth1Signer {
    consumer_key: String,
    consumer_secret: String,
    token: Option<String>,
    token_secret: Option<String>,
}

impl OAuth1Signer {
    /// Signer for ordinary API calls, using durable credentials.
    #[must_use]
    pub fn new(credentials: &Credentials) -> Self {
        Self {
            consumer_key: credentials.consumer_key.clone(),
            consumer_secret: credentials.consumer_secret.clone(),
            token: Some(credentials.access_token.clone()),
            token_secret: Some(credentials.access_token_secret.clone()),
        }
    }

    /// Signer for the request-token leg: consumer key pair only, empty
    /// token secret.
    #[must_use]
    pub fn for_request_token(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: None,
            token_secret: None,
        }
    }

    /// Signer for the access-token leg, using the temporary request token.
    #[must_use]
    pub fn with_token(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: Some(token.into()),
            token_secret: Some(token_secret.into()),
        }
    }

    /// Sign one request attempt with a fresh nonce and the current time.
    ///
    /// `params` are the business query/body parameters that participate in
    /// the signature (form-encoded only; binary payloads are never signed).
    /// `extra_oauth` carries handshake protocol parameters such as
    /// `oauth_callback` and `oauth_verifier`.
    pub fn sign(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        extra_oauth: &[(String, String)],
    ) -> OauthResult<SignedRequest> {
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_err(|e| OauthError::Signature(format!("failed to get timestamp: {e}")))?
            .as_secs();

        self.sign_at(method, url, params, extra_oauth, &generate_nonce(), timestamp)
    }

    /// Deterministic signing core: fixed nonce and timestamp.
    ///
    /// The signature is a pure function of its inputs here, which is what
    /// the golden-vector tests exercise.
    pub fn sign_at(
        &self,
        method: &str,
        url: &str,
        params: &[(String, String)],
        extra_oauth: &[(String, String)],
        nonce: &str,
        timestamp: u64,
    ) -> OauthResult<SignedRequest> {
        let parsed = Url::parse(url)?;
        let base_url = base_url_without_query(&parsed);

        // Protocol parameters for this attempt.
        let mut oauth_params: Vec<(String, String)> = vec![
            ("oauth_consumer_key".into(), self.consumer_key.clone()),
            ("oauth_nonce".into(), nonce.to_string()),
            ("oauth_signature_method".into(), "HMAC-SHA1".into()),
            ("oauth_timestamp".into(), timestamp.to_string()),
            ("oauth_version".into(), "1.0".into()),
        ];
        if let Some(token) = &self.token {
            oauth_params.push(("oauth_token".into(), token.clone()));
        }
        for (k, v) in extra_oauth {
            oauth_params.push((k.clone(), v.clone()));
        }

        // Signature input: protocol params + URL query + business params,
        // percent-encoded and sorted by encoded key then encoded value.
        let mut all_params: Vec<(String, String)> = oauth_params.clone();
        for (k, v) in parsed.query_pairs() {
            all_params.push((k.into_owned(), v.into_owned()));
        }
        all_params.extend(params.iter().cloned());

        let mut encoded: Vec<(String, String)> = all_params
            .iter()
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .collect();
        encoded.sort();

        let param_string = encoded
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        let base_string = format!(
            "{}&{}&{}",
            method.to_uppercase(),
            percent_encode(&base_url),
            percent_encode(&param_string)
        );

        let signing_key = format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(self.token_secret.as_deref().unwrap_or(""))
        );

        let signature = hmac_sha1(&signing_key, &base_string)?;
        oauth_params.push(("oauth_signature".into(), signature.clone()));

        // The header carries protocol parameters only; business parameters
        // stay in the query string or form body.
        let header = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(SignedRequest {
            authorization: format!("OAuth {header}"),
            signature,
            nonce: nonce.to_string(),
            timestamp,
        })
    }
}

/// Scheme, host, optional non-default port, and path, without query or fragment.
fn base_url_without_query(url: &Url) -> String {
    let mut base = format!("{}://{}", url.scheme(), url.host_str().unwrap_or(""));
    if let Some(port) = url.port() {
        base.push_str(&format!(":{port}"));
    }
    base.push_str(url.path());
    base
}

/// Percent-encode per RFC 3986 unreserved-character rules.
#[must_use]
pub fn percent_encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// Generate a fresh random nonce: 32 hex characters.
fn generate_nonce() -> String {
    use rand::RngCore;
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// HMAC-SHA1 over `data` with `key`, base64-encoded.
fn hmac_sha1(key: &str, data: &str) -> OauthResult<String> {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes())
        .map_err(|e| OauthError::Signature(e.to_string()))?;
    mac.update(data.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}
