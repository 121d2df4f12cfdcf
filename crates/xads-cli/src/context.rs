//! Shared command context: credential loading and client construction.

use std::path::PathBuf;

use anyhow::Context as _;
use tokio_util::sync::CancellationToken;
use xads_client::{AdsClient, AdsConfig};
use xads_oauth::CredentialStore;

/// Default credential file location: `~/.config/x-ads/credentials`.
pub fn default_credential_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("x-ads")
        .join("credentials")
}

/// The store the CLI reads and the auth flow writes.
pub fn credential_store() -> CredentialStore {
    CredentialStore::new(default_credential_path())
}

/// Build a client from stored credentials, wired to the process
/// cancellation signal.
pub fn build_client(cancel: &CancellationToken) -> anyhow::Result<AdsClient> {
    let credentials = credential_store()
        .load()
        .context("failed to load credentials")?;
    let client = AdsClient::new(AdsConfig::new(credentials))
        .context("failed to construct Ads API client")?;
    Ok(client.with_cancellation(cancel.clone()))
}

/// Resolve the ad account id from the `--account` flag (clap also maps
/// `X_AD_ACCOUNT_ID` onto it); the core takes it as an explicit parameter
/// and never reads the environment itself.
pub fn require_account(account: Option<String>) -> anyhow::Result<String> {
    account.filter(|id| !id.is_empty()).ok_or_else(|| {
        anyhow::anyhow!("no ad account id: pass --account or set X_AD_ACCOUNT_ID")
    })
}

/// Convert a dollar amount to the API's micro units.
pub fn dollars_to_micros(dollars: f64) -> i64 {
    (dollars * 1_000_000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micros_conversion_rounds() {
        assert_eq!(dollars_to_micros(50.0), 50_000_000);
        assert_eq!(dollars_to_micros(0.01), 10_000);
        assert_eq!(dollars_to_micros(1.234_567_8), 1_234_568);
    }

    #[test]
    fn missing_account_is_an_error() {
        assert!(require_account(None).is_err());
        assert!(require_account(Some(String::new())).is_err());
        assert_eq!(require_account(Some("x1".into())).unwrap(), "x1");
    }
}
