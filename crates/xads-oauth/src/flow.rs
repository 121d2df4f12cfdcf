//! Three-legged OAuth 1.0a authorization flow.
//!
//! `Start → RequestTokenObtained → AuthorizedByUser → AccessTokenObtained`,
//! with any HTTP failure or denied authorization aborting the flow. The
//! user-authorization step is a blocking wait on external input (a PIN or
//! callback-delivered verifier) supplied by the caller; credentials are
//! persisted only after the final leg succeeds.

use std::collections::HashMap;

use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::{OauthError, OauthResult};
use crate::signer::OAuth1Signer;
use crate::store::{CredentialStore, Credentials};

const DEFAULT_REQUEST_TOKEN_URL: &str = "https://api.twitter.com/oauth/request_token";
const DEFAULT_AUTHORIZE_URL: &str = "https://api.twitter.com/oauth/authorize";
const DEFAULT_ACCESS_TOKEN_URL: &str = "https://api.twitter.com/oauth/access_token";

/// Endpoints and consumer identity for the handshake.
#[derive(Debug, Clone)]
pub struct AuthFlowConfig {
    /// Consumer key (API key).
    pub consumer_key: String,
    /// Consumer secret (API secret).
    pub consumer_secret: String,
    /// Request-token endpoint.
    pub request_token_url: String,
    /// User-authorization endpoint.
    pub authorization_url: String,
    /// Access-token endpoint.
    pub access_token_url: String,
    /// Callback URL; `oob` selects the PIN flow.
    pub callback: String,
}

impl AuthFlowConfig {
    /// Configuration against the production endpoints, PIN flow.
    #[must_use]
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            request_token_url: DEFAULT_REQUEST_TOKEN_URL.into(),
            authorization_url: DEFAULT_AUTHORIZE_URL.into(),
            access_token_url: DEFAULT_ACCESS_TOKEN_URL.into(),
            callback: "oob".into(),
        }
    }

    /// Override all three endpoints (tests point these at a mock server).
    #[must_use]
    pub fn with_endpoints(
        mut self,
        request_token_url: impl Into<String>,
        authorization_url: impl Into<String>,
        access_token_url: impl Into<String>,
    ) -> Self {
        self.request_token_url = request_token_url.into();
        self.authorization_url = authorization_url.into();
        self.access_token_url = access_token_url.into();
        self
    }

    /// Use a callback URL instead of the PIN flow.
    #[must_use]
    pub fn with_callback(mut self, callback: impl Into<String>) -> Self {
        self.callback = callback.into();
        self
    }
}

/// Temporary credentials from the first leg. Exchanged for durable
/// credentials, then discarded; never persisted.
#[derive(Debug, Clone)]
pub struct RequestToken {
    /// Temporary token.
    pub token: String,
    /// Temporary token secret.
    pub token_secret: String,
    /// Whether the provider confirmed the callback.
    pub callback_confirmed: bool,
}

/// Drives the three-legged handshake.
#[derive(Debug, Clone)]
pub struct AuthFlow {
    config: AuthFlowConfig,
    http: Client,
}

impl AuthFlow {
    /// New flow with a default HTTP client.
    #[must_use]
    pub fn new(config: AuthFlowConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// New flow with a caller-supplied HTTP client.
    #[must_use]
    pub const fn with_http_client(config: AuthFlowConfig, http: Client) -> Self {
        Self { config, http }
    }

    /// Leg 1: obtain a request token, signed with the consumer key pair
    /// only (empty token secret).
    #[instrument(skip(self))]
    pub async fn request_token(&self) -> OauthResult<RequestToken> {
        let signer =
            OAuth1Signer::for_request_token(&self.config.consumer_key, &self.config.consumer_secret);
        let extra = vec![("oauth_callback".to_string(), self.config.callback.clone())];
        let signed = signer.sign("POST", &self.config.request_token_url, &[], &extra)?;

        let response = self
            .http
            .post(&self.config.request_token_url)
            .header("Authorization", signed.authorization)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(OauthError::TokenExchange(format!(
                "request token endpoint returned {status}: {body}"
            )));
        }

        let fields = parse_form_body(&body)?;
        let token = required(&fields, "oauth_token")?;
        let token_secret = required(&fields, "oauth_token_secret")?;
        let callback_confirmed = fields
            .get("oauth_callback_confirmed")
            .is_some_and(|v| v == "true");

        debug!(callback_confirmed, "obtained request token");
        Ok(RequestToken {
            token,
            token_secret,
            callback_confirmed,
        })
    }

    /// Leg 2: the URL the user must visit to approve the request token.
    #[must_use]
    pub fn authorization_url(&self, request_token: &RequestToken) -> String {
        format!(
            "{}?oauth_token={}",
            self.config.authorization_url, request_token.token
        )
    }

    /// Leg 3: exchange the approved request token plus verifier for the
    /// durable token pair.
    #[instrument(skip(self, request_token, verifier))]
    pub async fn access_token(
        &self,
        request_token: &RequestToken,
        verifier: &str,
    ) -> OauthResult<Credentials> {
        let signer = OAuth1Signer::with_token(
            &self.config.consumer_key,
            &self.config.consumer_secret,
            &request_token.token,
            &request_token.token_secret,
        );
        let extra = vec![("oauth_verifier".to_string(), verifier.to_string())];
        let signed = signer.sign("POST", &self.config.access_token_url, &[], &extra)?;

        let response = self
            .http
            .post(&self.config.access_token_url)
            .header("Authorization", signed.authorization)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(OauthError::Denied(format!(
                "access token endpoint rejected the verifier ({status})"
            )));
        }
        if !status.is_success() {
            return Err(OauthError::TokenExchange(format!(
                "access token endpoint returned {status}: {body}"
            )));
        }

        let fields = parse_form_body(&body)?;
        Ok(Credentials {
            consumer_key: self.config.consumer_key.clone(),
            consumer_secret: self.config.consumer_secret.clone(),
            access_token: required(&fields, "oauth_token")?,
            access_token_secret: required(&fields, "oauth_token_secret")?,
        })
    }

    /// Run the whole handshake.
    ///
    /// `prompt` receives the authorization URL and must return the verifier
    /// the user obtained out-of-band; returning an error cancels the flow.
    /// The store is written only after the final leg succeeds; no partial
    /// credentials are ever persisted.
    pub async fn run<F>(&self, store: &CredentialStore, prompt: F) -> OauthResult<Credentials>
    where
        F: FnOnce(&str) -> OauthResult<String>,
    {
        let request_token = self.request_token().await?;
        let url = self.authorization_url(&request_token);
        let verifier = prompt(&url)?;
        let credentials = self.access_token(&request_token, &verifier).await?;
        store.save(&credentials)?;
        Ok(credentials)
    }
}

fn parse_form_body(body: &str) -> OauthResult<HashMap<String, String>> {
    serde_urlencoded::from_str(body)
        .map_err(|e| OauthError::InvalidTokenResponse(format!("unparseable body: {e}")))
}

fn required(fields: &HashMap<String, String>, key: &str) -> OauthResult<String> {
    fields
        .get(key)
        .filter(|v| !v.is_empty())
        .cloned()
        .ok_or_else(|| OauthError::InvalidTokenResponse(format!("missing {key}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> AuthFlowConfig {
        AuthFlowConfig::new("ck", "cs").with_endpoints(
            format!("{}/oauth/request_token", server.uri()),
            format!("{}/oauth/authorize", server.uri()),
            format!("{}/oauth/access_token", server.uri()),
        )
    }

    async fn mount_request_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/oauth/request_token"))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                "oauth_token=req_tok&oauth_token_secret=req_sec&oauth_callback_confirmed=true",
            ))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn happy_path_persists_credentials() {
        let server = MockServer::start().await;
        mount_request_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/oauth/access_token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("oauth_token=acc_tok&oauth_token_secret=acc_sec"),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials"));
        let flow = AuthFlow::new(test_config(&server));

        let credentials = flow
            .run(&store, |url| {
                assert!(url.contains("oauth_token=req_tok"));
                Ok("123456".to_string())
            })
            .await
            .unwrap();

        assert_eq!(credentials.access_token, "acc_tok");
        assert_eq!(credentials.access_token_secret, "acc_sec");
        assert!(credentials.is_complete());
        assert_eq!(store.load().unwrap(), credentials);
    }

    #[tokio::test]
    async fn denied_verifier_leaves_store_untouched() {
        let server = MockServer::start().await;
        mount_request_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/oauth/access_token"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials"));
        let flow = AuthFlow::new(test_config(&server));

        let err = flow
            .run(&store, |_| Ok("bad-pin".to_string()))
            .await
            .unwrap_err();

        assert!(matches!(err, OauthError::Denied(_)));
        assert!(!store.exists());
    }

    #[tokio::test]
    async fn cancelled_prompt_aborts_before_exchange() {
        let server = MockServer::start().await;
        mount_request_token(&server).await;
        // No access-token mock: the flow must never reach it.

        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("credentials"));
        let flow = AuthFlow::new(test_config(&server));

        let err = flow
            .run(&store, |_| {
                Err(OauthError::Denied("user interrupted".into()))
            })
            .await
            .unwrap_err();

        assert!(matches!(err, OauthError::Denied(_)));
        assert!(!store.exists());
    }

    #[tokio::test]
    async fn missing_token_field_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/request_token"))
            .respond_with(ResponseTemplate::new(200).set_body_string("oauth_token=only_half"))
            .mount(&server)
            .await;

        let flow = AuthFlow::new(test_config(&server));
        let err = flow.request_token().await.unwrap_err();
        assert!(matches!(err, OauthError::InvalidTokenResponse(_)));
    }

    #[tokio::test]
    async fn request_token_http_failure_aborts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/request_token"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let flow = AuthFlow::new(test_config(&server));
        let err = flow.request_token().await.unwrap_err();
        assert!(matches!(err, OauthError::TokenExchange(_)));
    }

    #[test]
    fn authorization_url_carries_request_token() {
        let config = AuthFlowConfig::new("ck", "cs");
        let flow = AuthFlow::new(config);
        let rt = RequestToken {
            token: "tok123".into(),
            token_secret: "sec".into(),
            callback_confirmed: true,
        };
        assert_eq!(
            flow.authorization_url(&rt),
            "https://api.twitter.com/oauth/authorize?oauth_token=tok123"
        );
    }
}
