//! Signed HTTP dispatch with retry and backoff.
//!
//! This is the only place that talks to the network for ordinary calls.
//! Every attempt re-signs the request, because nonce and timestamp must be
//! fresh per attempt; the retry loop is driven by the injected
//! [`RetryPolicy`](crate::RetryPolicy) and the error taxonomy's
//! `is_retryable`.

use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use xads_oauth::OAuth1Signer;

use crate::config::{AdsConfig, RateLimitInfo};
use crate::error::{AdsError, AdsResult};
use crate::response::{ApiResponse, Envelope};

/// X Ads API client.
///
/// Holds the signer and configuration for one process invocation; commands
/// drive at most one request at a time through it.
#[derive(Debug)]
pub struct AdsClient {
    http: Client,
    signer: OAuth1Signer,
    pub(crate) config: AdsConfig,
    cancel: CancellationToken,
}

/// Request body for one dispatch. Form bodies participate in the OAuth
/// signature; JSON and binary bodies never do.
pub(crate) enum RequestBody<'a> {
    Empty,
    Form(&'a [(String, String)]),
    Json(&'a Value),
    /// One binary multipart part, rebuilt for every attempt.
    Media(&'a [u8]),
}

impl AdsClient {
    /// Build a client. Fails fast when the credential set is incomplete.
    pub fn new(config: AdsConfig) -> AdsResult<Self> {
        if !config.credentials.is_complete() {
            return Err(AdsError::Config(
                "incomplete credentials: run the auth flow first".into(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(format!("x-ads/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        let signer = OAuth1Signer::new(&config.credentials);

        Ok(Self {
            http,
            signer,
            config,
            cancel: CancellationToken::new(),
        })
    }

    /// Attach a caller-supplied cancellation signal. It is checked before
    /// every attempt and every retry/poll sleep.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub(crate) fn cancel(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Full URL for a versioned Ads API path like `accounts/x1/campaigns`.
    #[must_use]
    pub fn ads_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.config.ads_api_url,
            self.config.ads_api_version,
            path.trim_start_matches('/')
        )
    }

    /// Full URL for a public API path like `/2/tweets`.
    #[must_use]
    pub fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_url, path.trim_start_matches('/'))
    }

    /// The chunked media upload endpoint.
    #[must_use]
    pub fn upload_url(&self) -> String {
        format!("{}/1.1/media/upload.json", self.config.upload_url)
    }

    /// Execute one signed request against an envelope endpoint.
    ///
    /// `query` and `form` parameters both participate in the signature.
    #[instrument(skip(self, query, form))]
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
        form: Option<&[(String, String)]>,
    ) -> AdsResult<ApiResponse> {
        let body = match form {
            Some(pairs) => RequestBody::Form(pairs),
            None => RequestBody::Empty,
        };
        let (status, bytes) = self.dispatch(&method, url, query, &body).await?;
        let envelope: Envelope = if bytes.is_empty() {
            Envelope::default()
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(ApiResponse::from_envelope(status.as_u16(), envelope))
    }

    /// Execute a signed request with a JSON body (tweet creation). JSON
    /// bodies are never part of an OAuth 1.0a signature, so only the query
    /// parameters are signed.
    pub(crate) async fn execute_json(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
        json: &Value,
    ) -> AdsResult<ApiResponse> {
        let (status, bytes) = self
            .dispatch(&method, url, query, &RequestBody::Json(json))
            .await?;
        let envelope: Envelope = if bytes.is_empty() {
            Envelope::default()
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(ApiResponse::from_envelope(status.as_u16(), envelope))
    }

    /// Execute a signed request and decode the body as a bare JSON value.
    /// The upload host answers without the `data` envelope.
    pub(crate) async fn execute_bare(
        &self,
        method: Method,
        url: &str,
        query: &[(String, String)],
        body: &RequestBody<'_>,
    ) -> AdsResult<Value> {
        let (_, bytes) = self.dispatch(&method, url, query, body).await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(AdsError::from)
    }

    /// The retry loop: bounded attempts, fresh signature per attempt,
    /// server-suggested or exponential backoff between retryable failures,
    /// cancellation checked before each attempt and each sleep.
    async fn dispatch(
        &self,
        method: &Method,
        url: &str,
        query: &[(String, String)],
        body: &RequestBody<'_>,
    ) -> AdsResult<(StatusCode, Vec<u8>)> {
        let mut attempt: u32 = 0;

        loop {
            if self.cancel.is_cancelled() {
                return Err(AdsError::Cancelled);
            }

            attempt += 1;
            debug!(attempt, url, "issuing Ads API request");

            match self.attempt_once(method, url, query, body).await {
                Ok(ok) => return Ok(ok),
                Err(e) if e.is_retryable() && attempt < self.config.retry.max_attempts => {
                    let delay = e
                        .retry_after()
                        .unwrap_or_else(|| self.config.retry.delay_for(attempt - 1))
                        .min(self.config.retry.max_delay);
                    warn!(
                        attempt,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %e,
                        "retrying Ads API request"
                    );
                    tokio::select! {
                        () = self.cancel.cancelled() => return Err(AdsError::Cancelled),
                        () = tokio::time::sleep(delay) => {}
                    }
                }
                Err(e) if e.is_retryable() => {
                    return Err(AdsError::RetriesExhausted {
                        attempts: attempt,
                        last: Box::new(e),
                    });
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One signed attempt. Never retries on its own.
    async fn attempt_once(
        &self,
        method: &Method,
        url: &str,
        query: &[(String, String)],
        body: &RequestBody<'_>,
    ) -> AdsResult<(StatusCode, Vec<u8>)> {
        // Form parameters are signed alongside the query; JSON and binary
        // payloads are excluded from the signature.
        let signed_params: Vec<(String, String)> = match body {
            RequestBody::Form(pairs) => query.iter().chain(pairs.iter()).cloned().collect(),
            _ => query.to_vec(),
        };
        let signed = self
            .signer
            .sign(method.as_str(), url, &signed_params, &[])?;

        let mut request = self
            .http
            .request(method.clone(), url)
            .header("Authorization", signed.authorization);
        if !query.is_empty() {
            request = request.query(query);
        }
        request = match body {
            RequestBody::Empty => request,
            RequestBody::Form(pairs) => request.form(pairs),
            RequestBody::Json(json) => request.json(json),
            RequestBody::Media(bytes) => {
                let part = reqwest::multipart::Part::bytes(bytes.to_vec());
                request.multipart(reqwest::multipart::Form::new().part("media", part))
            }
        };

        let response = request.send().await?;
        Self::check_response(response).await
    }

    /// Map a response to success bytes or the error taxonomy.
    async fn check_response(response: Response) -> AdsResult<(StatusCode, Vec<u8>)> {
        let status = response.status();
        let rate = RateLimitInfo::from_headers(response.headers());

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AdsError::RateLimited {
                retry_after: rate.suggested_wait(),
            });
        }

        let bytes = response.bytes().await?.to_vec();

        if status.is_success() {
            return Ok((status, bytes));
        }

        let errors = serde_json::from_slice::<Envelope>(&bytes)
            .map(|envelope| envelope.errors)
            .unwrap_or_default();

        if status == StatusCode::UNAUTHORIZED {
            let detail = errors
                .first()
                .map_or_else(|| "credentials rejected".to_string(), ToString::to_string);
            return Err(AdsError::Unauthorized(detail));
        }

        Err(AdsError::Api {
            status: status.as_u16(),
            errors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPolicy;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use xads_oauth::Credentials;

    fn test_credentials() -> Credentials {
        Credentials {
            consumer_key: "ck".into(),
            consumer_secret: "cs".into(),
            access_token: "at".into(),
            access_token_secret: "ats".into(),
        }
    }

    fn test_client(server: &MockServer, retry: RetryPolicy) -> AdsClient {
        let mut config = AdsConfig::new(test_credentials()).with_base_url(server.uri());
        config.retry = retry;
        AdsClient::new(config).unwrap()
    }

    #[test]
    fn incomplete_credentials_fail_fast() {
        let mut credentials = test_credentials();
        credentials.access_token = String::new();
        let err = AdsClient::new(AdsConfig::new(credentials)).unwrap_err();
        assert!(matches!(err, AdsError::Config(_)));
    }

    #[tokio::test]
    async fn success_decodes_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/12/accounts"))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [{"id": "x1"}],
                "next_cursor": "c2"
            })))
            .mount(&server)
            .await;

        let client = test_client(&server, RetryPolicy::immediate(3));
        let response = client
            .execute(Method::GET, &client.ads_url("accounts"), &[], None)
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.items().len(), 1);
        assert_eq!(response.next_cursor.as_deref(), Some("c2"));
    }

    #[tokio::test]
    async fn rate_limit_retries_honoring_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/12/accounts"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "1")
                    .set_body_json(serde_json::json!({"errors": [{"message": "Too Many Requests"}]})),
            )
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/12/accounts"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})),
            )
            .mount(&server)
            .await;

        // Backoff would be fast; only the Retry-After value forces a wait.
        let retry = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_secs(60),
            jitter: 0.0,
        };
        let client = test_client(&server, retry);

        let start = Instant::now();
        let response = client
            .execute(Method::GET, &client.ads_url("accounts"), &[], None)
            .await
            .unwrap();
        let elapsed = start.elapsed();

        assert_eq!(response.status, 200);
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
        assert!(
            elapsed >= Duration::from_secs(2),
            "two retries must each wait the advertised 1s, got {elapsed:?}"
        );
    }

    #[tokio::test]
    async fn rejection_never_retries_and_surfaces_errors_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/12/accounts/x1/campaigns"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "errors": [{
                    "code": "MISSING_PARAMETER",
                    "message": "funding_instrument_id is required",
                    "parameter": "funding_instrument_id"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, RetryPolicy::immediate(5));
        let err = client
            .execute(
                Method::POST,
                &client.ads_url("accounts/x1/campaigns"),
                &[],
                Some(&[("name".to_string(), "c".to_string())]),
            )
            .await
            .unwrap_err();

        match err {
            AdsError::Api { status, errors } => {
                assert_eq!(status, 400);
                assert_eq!(errors.len(), 1);
                assert_eq!(
                    errors[0].message.as_deref(),
                    Some("funding_instrument_id is required")
                );
                assert_eq!(errors[0].parameter.as_deref(), Some("funding_instrument_id"));
            }
            other => panic!("expected Api rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_errors_retry_then_succeed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/12/accounts"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/12/accounts"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})),
            )
            .mount(&server)
            .await;

        let client = test_client(&server, RetryPolicy::immediate(3));
        let response = client
            .execute(Method::GET, &client.ads_url("accounts"), &[], None)
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn exhaustion_is_tagged_distinctly() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/12/accounts"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = test_client(&server, RetryPolicy::immediate(3));
        let err = client
            .execute(Method::GET, &client.ads_url("accounts"), &[], None)
            .await
            .unwrap_err();

        match err {
            AdsError::RetriesExhausted { attempts, last } => {
                assert_eq!(attempts, 3);
                assert!(matches!(*last, AdsError::Api { status: 500, .. }));
            }
            other => panic!("expected RetriesExhausted, got {other:?}"),
        }
        assert_eq!(server.received_requests().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn unauthorized_is_terminal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/12/accounts"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "errors": [{"code": "UNAUTHORIZED_ACCESS", "message": "bad token"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server, RetryPolicy::immediate(5));
        let err = client
            .execute(Method::GET, &client.ads_url("accounts"), &[], None)
            .await
            .unwrap_err();

        assert!(matches!(err, AdsError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn cancellation_stops_before_any_attempt() {
        let server = MockServer::start().await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let client = test_client(&server, RetryPolicy::immediate(5)).with_cancellation(cancel);
        let err = client
            .execute(Method::GET, &client.ads_url("accounts"), &[], None)
            .await
            .unwrap_err();

        assert!(matches!(err, AdsError::Cancelled));
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }
}
