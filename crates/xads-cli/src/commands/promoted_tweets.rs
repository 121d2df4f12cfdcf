//! `x-ads promoted-tweets`: tweet promotion and creation.

use clap::{Args, Subcommand};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::AccountArg;
use crate::context;
use crate::output;

#[derive(Debug, Subcommand)]
pub enum PromotedTweetCommand {
    /// List promoted tweets for an ad account.
    List(ListArgs),

    /// Promote tweet(s) to a line item.
    Promote(PromoteArgs),

    /// Create a new tweet (does NOT promote it).
    CreateTweet(CreateTweetArgs),

    /// Remove (un-promote) a promoted tweet.
    Remove(IdArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Filter by line item ID.
    #[arg(long = "line-item")]
    pub line_item: Option<String>,

    #[command(flatten)]
    pub account: AccountArg,
}

#[derive(Debug, Args)]
pub struct PromoteArgs {
    /// Line item ID.
    #[arg(long = "line-item")]
    pub line_item: String,

    /// Tweet ID(s); repeat or comma-separate.
    #[arg(long = "tweet", required = true, num_args = 1..)]
    pub tweet: Vec<String>,

    #[command(flatten)]
    pub account: AccountArg,
}

#[derive(Debug, Args)]
pub struct CreateTweetArgs {
    /// Tweet text.
    #[arg(long)]
    pub text: String,

    /// Card ID to attach.
    #[arg(long)]
    pub card: Option<String>,

    /// Media ID(s), comma-separated.
    #[arg(long)]
    pub media: Option<String>,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    /// Promoted tweet ID.
    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub account: AccountArg,
}

pub async fn run(command: PromotedTweetCommand, cancel: &CancellationToken) -> anyhow::Result<()> {
    match command {
        PromotedTweetCommand::List(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            let promoted = client
                .list_promoted_tweets(&account, args.line_item.as_deref())
                .await?;
            output::print_ok(&promoted);
        }
        PromotedTweetCommand::Promote(args) => {
            let account = context::require_account(args.account.account)?;
            // Flatten comma-separated values:
            // --tweet 123,456 --tweet 789 becomes ["123","456","789"].
            let tweet_ids: Vec<String> = args
                .tweet
                .iter()
                .flat_map(|t| t.split(','))
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            anyhow::ensure!(!tweet_ids.is_empty(), "no tweet ids provided");

            let client = context::build_client(cancel)?;
            let promoted = client
                .promote_tweets(&account, &args.line_item, &tweet_ids)
                .await?;
            output::print_ok(&promoted);
        }
        PromotedTweetCommand::CreateTweet(args) => {
            let card_uri = args.card.map(|id| format!("card://{id}"));
            let media_ids: Vec<String> = args
                .media
                .map(|m| {
                    m.split(',')
                        .map(|id| id.trim().to_string())
                        .filter(|id| !id.is_empty())
                        .collect()
                })
                .unwrap_or_default();

            let client = context::build_client(cancel)?;
            let tweet = client
                .create_tweet(&args.text, card_uri.as_deref(), &media_ids)
                .await?;
            output::print_ok(&tweet);
        }
        PromotedTweetCommand::Remove(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            client.delete_promoted_tweet(&account, &args.id).await?;
            output::print_ok(&json!({ "id": args.id, "deleted": true }));
        }
    }
    Ok(())
}
