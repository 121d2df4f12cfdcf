//! `x-ads audiences`: tailored audiences.

use clap::{Args, Subcommand};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::AccountArg;
use crate::context;
use crate::output;

#[derive(Debug, Subcommand)]
pub enum AudienceCommand {
    /// List tailored audiences for an ad account.
    List(AccountArg),

    /// Create a new (empty) tailored audience.
    Create(CreateArgs),

    /// Remove a tailored audience.
    Remove(IdArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Audience name.
    #[arg(long)]
    pub name: String,

    /// List type: EMAIL, DEVICE_ID, TWITTER_ID, HANDLE, or PHONE_NUMBER.
    #[arg(long = "list-type", default_value = "EMAIL")]
    pub list_type: String,

    #[command(flatten)]
    pub account: AccountArg,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    /// Audience ID.
    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub account: AccountArg,
}

pub async fn run(command: AudienceCommand, cancel: &CancellationToken) -> anyhow::Result<()> {
    match command {
        AudienceCommand::List(args) => {
            let account = context::require_account(args.account)?;
            let client = context::build_client(cancel)?;
            let audiences = client.list_audiences(&account).await?;
            output::print_ok(&audiences);
        }
        AudienceCommand::Create(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            let audience = client
                .create_audience(&account, &args.name, &args.list_type)
                .await?;
            output::print_ok(&audience);
        }
        AudienceCommand::Remove(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            client.delete_audience(&account, &args.id).await?;
            output::print_ok(&json!({ "id": args.id, "deleted": true }));
        }
    }
    Ok(())
}
