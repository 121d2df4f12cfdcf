//! `x-ads cards`: website cards.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Subcommand};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use xads_client::CardUpdate;

use super::media::{category_for, mime_for};
use super::AccountArg;
use crate::context;
use crate::output;

#[derive(Debug, Subcommand)]
pub enum CardCommand {
    /// List website cards for an ad account.
    List(AccountArg),

    /// Create a new website card.
    Create(CreateArgs),

    /// Update an existing website card.
    Update(UpdateArgs),

    /// Remove (delete) a website card.
    Remove(IdArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Card name (internal label).
    #[arg(long)]
    pub name: String,

    /// Website title displayed on the card (max 70 chars).
    #[arg(long)]
    pub title: String,

    /// Destination URL.
    #[arg(long)]
    pub url: String,

    /// Path to image file (.jpg, .png, .gif, .webp).
    #[arg(long)]
    pub image: PathBuf,

    #[command(flatten)]
    pub account: AccountArg,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Card ID.
    #[arg(long)]
    pub id: String,

    /// New card name.
    #[arg(long)]
    pub name: Option<String>,

    /// New website title.
    #[arg(long)]
    pub title: Option<String>,

    /// New destination URL.
    #[arg(long)]
    pub url: Option<String>,

    #[command(flatten)]
    pub account: AccountArg,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    /// Card ID.
    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub account: AccountArg,
}

pub async fn run(command: CardCommand, cancel: &CancellationToken) -> anyhow::Result<()> {
    match command {
        CardCommand::List(args) => {
            let account = context::require_account(args.account)?;
            let client = context::build_client(cancel)?;
            let cards = client.list_website_cards(&account).await?;
            output::print_ok(&cards);
        }
        CardCommand::Create(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;

            // A website card wraps an uploaded image, so upload first.
            let bytes = std::fs::read(&args.image)
                .with_context(|| format!("could not read {}", args.image.display()))?;
            let mime = mime_for(&args.image)?;
            let uploaded = client
                .upload_media(&bytes, mime, category_for(mime))
                .await?;
            let media_key = uploaded
                .media_key
                .context("upload returned no media key; cannot attach to a card")?;

            let card = client
                .create_website_card(&account, &args.name, &args.title, &args.url, &media_key)
                .await?;
            output::print_ok(&card);
        }
        CardCommand::Update(args) => {
            let account = context::require_account(args.account.account)?;
            let update = CardUpdate {
                name: args.name,
                website_title: args.title,
                website_url: args.url,
            };
            anyhow::ensure!(
                update.name.is_some() || update.website_title.is_some() || update.website_url.is_some(),
                "no update fields provided: use --name, --title, or --url"
            );
            let client = context::build_client(cancel)?;
            let card = client.update_website_card(&account, &args.id, &update).await?;
            output::print_ok(&card);
        }
        CardCommand::Remove(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            client.delete_website_card(&account, &args.id).await?;
            output::print_ok(&json!({ "id": args.id, "deleted": true }));
        }
    }
    Ok(())
}
