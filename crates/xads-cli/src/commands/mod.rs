//! Subcommand implementations.
//!
//! Each module is thin glue: parse arguments, resolve the ad account,
//! call the typed client surface, print one JSON document.

pub mod accounts;
pub mod audiences;
pub mod auth;
pub mod campaigns;
pub mod cards;
pub mod funding;
pub mod line_items;
pub mod media;
pub mod promoted_tweets;
pub mod stats;
pub mod targeting;

/// The ad-account override shared by account-scoped commands. The
/// environment fallback is resolved here, in the CLI layer; the client
/// core only ever sees the explicit value.
#[derive(Debug, clap::Args)]
pub struct AccountArg {
    /// Ad account ID (overrides X_AD_ACCOUNT_ID).
    #[arg(long, env = "X_AD_ACCOUNT_ID")]
    pub account: Option<String>,
}
