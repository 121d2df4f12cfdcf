//! `x-ads` CLI entrypoint.
//!
//! Argument parsing and structured output live here; every network
//! concern (signing, retry, pagination, upload) stays behind the
//! `xads-client` surface. Results print as one JSON document on stdout;
//! logs go to stderr so stdout stays machine-readable.

#![forbid(unsafe_code)]

mod commands;
mod context;
mod output;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

/// Command-line client for managing X (Twitter) ad campaigns.
#[derive(Parser)]
#[command(name = "x-ads")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate with X (OAuth 1.0a).
    #[command(subcommand)]
    Auth(commands::auth::AuthCommand),

    /// List accessible ad accounts.
    Accounts,

    /// Manage funding instruments (payment methods).
    #[command(subcommand)]
    Funding(commands::funding::FundingCommand),

    /// Manage campaigns.
    #[command(subcommand)]
    Campaigns(commands::campaigns::CampaignCommand),

    /// Manage line items (targeting containers with objectives).
    #[command(subcommand, name = "line-items")]
    LineItems(commands::line_items::LineItemCommand),

    /// Manage promoted tweets (ads).
    #[command(subcommand, name = "promoted-tweets")]
    PromotedTweets(commands::promoted_tweets::PromotedTweetCommand),

    /// Manage website cards.
    #[command(subcommand)]
    Cards(commands::cards::CardCommand),

    /// Manage tailored audiences.
    #[command(subcommand)]
    Audiences(commands::audiences::AudienceCommand),

    /// Discover and manage targeting criteria.
    #[command(subcommand)]
    Targeting(commands::targeting::TargetingCommand),

    /// Fetch analytics for campaigns, line items, or promoted tweets.
    Stats(commands::stats::StatsArgs),

    /// Media upload utilities.
    #[command(subcommand)]
    Media(commands::media::MediaCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs to stderr so stdout is clean for JSON output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    // Ctrl-C cancels cooperatively: in-flight retry and poll loops stop
    // within one delay window.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
    }

    let result = match cli.command {
        Commands::Auth(cmd) => commands::auth::run(cmd).await,
        Commands::Accounts => commands::accounts::run(&cancel).await,
        Commands::Funding(cmd) => commands::funding::run(cmd, &cancel).await,
        Commands::Campaigns(cmd) => commands::campaigns::run(cmd, &cancel).await,
        Commands::LineItems(cmd) => commands::line_items::run(cmd, &cancel).await,
        Commands::PromotedTweets(cmd) => commands::promoted_tweets::run(cmd, &cancel).await,
        Commands::Cards(cmd) => commands::cards::run(cmd, &cancel).await,
        Commands::Audiences(cmd) => commands::audiences::run(cmd, &cancel).await,
        Commands::Targeting(cmd) => commands::targeting::run(cmd, &cancel).await,
        Commands::Stats(args) => commands::stats::run(args, &cancel).await,
        Commands::Media(cmd) => commands::media::run(cmd, &cancel).await,
    };

    match result {
        Ok(()) => Ok(()),
        Err(error) => {
            output::print_error(&error);
            std::process::exit(1);
        }
    }
}
