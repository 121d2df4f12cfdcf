//! `x-ads targeting`: targeting discovery and line item criteria.

use clap::{Args, Subcommand};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::AccountArg;
use crate::context;
use crate::output;

#[derive(Debug, Subcommand)]
pub enum TargetingCommand {
    /// Search targetable locations.
    Locations(LocationArgs),

    /// List targetable interests.
    Interests,

    /// Search targetable conversation topics.
    Conversations(QueryArgs),

    /// List targetable device platforms.
    Platforms,

    /// Show targeting criteria for a line item.
    Show(LineItemArgs),

    /// Add targeting criteria to a line item.
    Add(AddArgs),

    /// Remove a targeting criterion.
    Remove(IdArgs),
}

#[derive(Debug, Args)]
pub struct LocationArgs {
    /// Search query.
    pub query: String,

    /// Location types to search (comma-separated).
    #[arg(long = "location-type", default_value = "CITY,STATE,COUNTRY,POSTAL_CODE")]
    pub location_type: String,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Search query.
    pub query: String,
}

#[derive(Debug, Args)]
pub struct LineItemArgs {
    /// Line item ID.
    #[arg(long = "line-item")]
    pub line_item: String,

    #[command(flatten)]
    pub account: AccountArg,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Line item ID.
    #[arg(long = "line-item")]
    pub line_item: String,

    /// Targeting type: LOCATION, INTEREST, CONVERSATION, TAILORED_AUDIENCE, etc.
    #[arg(long = "type")]
    pub targeting_type: String,

    /// Targeting value(s); repeat for several.
    #[arg(long = "value", required = true, num_args = 1..)]
    pub values: Vec<String>,

    #[command(flatten)]
    pub account: AccountArg,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    /// Targeting criterion ID.
    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub account: AccountArg,
}

pub async fn run(command: TargetingCommand, cancel: &CancellationToken) -> anyhow::Result<()> {
    match command {
        TargetingCommand::Locations(args) => {
            let client = context::build_client(cancel)?;
            let locations = client
                .search_targeting_locations(&args.query, &args.location_type)
                .await?;
            output::print_ok(&locations);
        }
        TargetingCommand::Interests => {
            let client = context::build_client(cancel)?;
            let interests = client.list_targeting_interests().await?;
            output::print_ok(&interests);
        }
        TargetingCommand::Conversations(args) => {
            let client = context::build_client(cancel)?;
            let conversations = client.search_targeting_conversations(&args.query).await?;
            output::print_ok(&conversations);
        }
        TargetingCommand::Platforms => {
            let client = context::build_client(cancel)?;
            let platforms = client.list_targeting_platforms().await?;
            output::print_ok(&platforms);
        }
        TargetingCommand::Show(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            let criteria = client
                .list_targeting_criteria(&account, &args.line_item)
                .await?;
            output::print_ok(&criteria);
        }
        TargetingCommand::Add(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;

            // Criteria are added one at a time; the endpoint takes a
            // single (type, value) pair per POST.
            let mut added = Vec::with_capacity(args.values.len());
            for value in &args.values {
                let criterion = client
                    .add_targeting_criterion(&account, &args.line_item, &args.targeting_type, value)
                    .await?;
                added.push(criterion);
            }
            output::print_ok(&added);
        }
        TargetingCommand::Remove(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            client.remove_targeting_criterion(&account, &args.id).await?;
            output::print_ok(&json!({ "id": args.id, "deleted": true }));
        }
    }
    Ok(())
}
