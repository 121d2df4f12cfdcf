//! Client configuration.
//!
//! All state the client needs is constructed once at startup and passed in
//! explicitly; there is no ambient singleton. The retry policy is a plain
//! value injected into the dispatch loop, not hidden looping state.

use std::time::Duration;

use xads_oauth::Credentials;

const DEFAULT_ADS_API_URL: &str = "https://ads-api.twitter.com";
const DEFAULT_ADS_API_VERSION: &str = "12";
const DEFAULT_API_URL: &str = "https://api.twitter.com";
const DEFAULT_UPLOAD_URL: &str = "https://upload.twitter.com";

/// Ceiling the remote protocol imposes on one APPEND chunk.
pub const UPLOAD_CHUNK_CEILING: usize = 5 * 1024 * 1024;

/// Configuration for [`crate::AdsClient`].
#[derive(Debug, Clone)]
pub struct AdsConfig {
    /// Durable OAuth 1.0a credentials. Must be complete; the client fails
    /// fast at construction otherwise.
    pub credentials: Credentials,

    /// Base URL of the Ads API host.
    pub ads_api_url: String,

    /// Ads API version path segment.
    pub ads_api_version: String,

    /// Base URL of the public API host (tweet creation).
    pub api_url: String,

    /// Base URL of the media upload host.
    pub upload_url: String,

    /// Per-request timeout.
    pub timeout: Duration,

    /// Retry/backoff policy.
    pub retry: RetryPolicy,

    /// Cursor-pagination page ceiling; exceeding it is an error rather
    /// than an endless loop.
    pub max_pages: u32,

    /// Chunk size for media APPEND, at most [`UPLOAD_CHUNK_CEILING`].
    pub upload_chunk_bytes: usize,

    /// Upper bound on the total time spent polling media processing.
    pub max_processing_wait: Duration,
}

impl AdsConfig {
    /// Configuration against the production hosts.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            ads_api_url: DEFAULT_ADS_API_URL.into(),
            ads_api_version: DEFAULT_ADS_API_VERSION.into(),
            api_url: DEFAULT_API_URL.into(),
            upload_url: DEFAULT_UPLOAD_URL.into(),
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
            max_pages: 500,
            upload_chunk_bytes: UPLOAD_CHUNK_CEILING,
            max_processing_wait: Duration::from_secs(300),
        }
    }

    /// Point every host at the same base URL (tests use a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('/').to_string();
        self.ads_api_url.clone_from(&base);
        self.api_url.clone_from(&base);
        self.upload_url = base;
        self
    }
}

/// Retry/backoff policy: a value, not mutable state.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempt bound, first try included.
    pub max_attempts: u32,

    /// Delay before the first retry.
    pub base_delay: Duration,

    /// Cap on any single delay.
    pub max_delay: Duration,

    /// Jitter factor in `0.0..=1.0`; each delay is scaled by a random
    /// factor in `1.0 ± jitter`.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            jitter: 0.1,
        }
    }
}

impl RetryPolicy {
    /// Exponential delay for the given retry ordinal (0 = first retry),
    /// capped and jittered.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let base = self.base_delay.as_secs_f64() * 2f64.powi(retry.min(31) as i32);
        let capped = base.min(self.max_delay.as_secs_f64());

        let jittered = if self.jitter > 0.0 {
            use rand::Rng;
            let factor = 1.0 + rand::thread_rng().gen_range(-self.jitter..=self.jitter);
            capped * factor
        } else {
            capped
        };

        Duration::from_secs_f64(jittered.max(0.0))
    }

    /// Policy with fast, deterministic delays for tests.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
            jitter: 0.0,
        }
    }
}

/// Rate limit information from Ads API response headers.
#[derive(Debug, Clone, Default)]
pub struct RateLimitInfo {
    /// Request quota for the current window.
    pub limit: Option<u32>,

    /// Requests remaining in the current window.
    pub remaining: Option<u32>,

    /// Unix timestamp at which the window resets.
    pub reset: Option<u64>,

    /// `Retry-After` value, when the server sent one.
    pub retry_after: Option<Duration>,
}

impl RateLimitInfo {
    /// Parse from response headers.
    #[must_use]
    pub fn from_headers(headers: &reqwest::header::HeaderMap) -> Self {
        let get_u64 = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
        };

        Self {
            limit: get_u64("x-rate-limit-limit").and_then(|v| u32::try_from(v).ok()),
            remaining: get_u64("x-rate-limit-remaining").and_then(|v| u32::try_from(v).ok()),
            reset: get_u64("x-rate-limit-reset"),
            retry_after: get_u64("retry-after").map(Duration::from_secs),
        }
    }

    /// True once the window quota is spent.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Server-suggested wait: `Retry-After` when present, otherwise the
    /// distance to the window reset.
    #[must_use]
    pub fn suggested_wait(&self) -> Option<Duration> {
        if self.retry_after.is_some() {
            return self.retry_after;
        }
        let reset = self.reset?;
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .ok()?
            .as_secs();
        (reset > now).then(|| Duration::from_secs(reset - now))
    }
}
