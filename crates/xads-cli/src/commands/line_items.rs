//! `x-ads line-items`: line item CRUD.

use clap::{Args, Subcommand};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use xads_client::{LineItemParams, LineItemUpdate};

use super::AccountArg;
use crate::context::{self, dollars_to_micros};
use crate::output;

#[derive(Debug, Subcommand)]
pub enum LineItemCommand {
    /// List line items for an ad account.
    List(ListArgs),

    /// Create a new line item.
    Create(CreateArgs),

    /// Update an existing line item.
    Update(UpdateArgs),

    /// Pause a line item.
    Pause(IdArgs),

    /// Remove (soft-delete) a line item.
    Remove(IdArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Filter by campaign ID.
    #[arg(long)]
    pub campaign: Option<String>,

    #[command(flatten)]
    pub account: AccountArg,
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Parent campaign ID.
    #[arg(long)]
    pub campaign: String,

    /// Line item name.
    #[arg(long)]
    pub name: String,

    /// Objective: AWARENESS, TWEET_ENGAGEMENTS, VIDEO_VIEWS, WEBSITE_CLICKS, etc.
    #[arg(long)]
    pub objective: String,

    /// Product type.
    #[arg(long = "product-type", default_value = "PROMOTED_TWEETS")]
    pub product_type: String,

    /// Placements (comma-separated).
    #[arg(long, default_value = "ALL_ON_TWITTER")]
    pub placements: String,

    /// Bid amount in USD.
    #[arg(long)]
    pub bid: Option<f64>,

    /// Bid type: AUTO, MAX, or TARGET.
    #[arg(long = "bid-type")]
    pub bid_type: Option<String>,

    /// Use automatic bidding.
    #[arg(long = "auto-bid")]
    pub auto_bid: bool,

    /// Total budget in USD.
    #[arg(long = "total-budget")]
    pub total_budget: Option<f64>,

    /// Entity status: ACTIVE, PAUSED, or DRAFT.
    #[arg(long, default_value = "PAUSED")]
    pub status: String,

    /// Start time (ISO 8601).
    #[arg(long = "start-time")]
    pub start_time: Option<String>,

    /// End time (ISO 8601).
    #[arg(long = "end-time")]
    pub end_time: Option<String>,

    #[command(flatten)]
    pub account: AccountArg,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    /// Line item ID.
    #[arg(long)]
    pub id: String,

    /// New line item name.
    #[arg(long)]
    pub name: Option<String>,

    /// Entity status: ACTIVE, PAUSED, or DRAFT.
    #[arg(long)]
    pub status: Option<String>,

    /// Bid amount in USD.
    #[arg(long)]
    pub bid: Option<f64>,

    /// Use automatic bidding.
    #[arg(long = "auto-bid")]
    pub auto_bid: bool,

    /// Total budget in USD.
    #[arg(long = "total-budget")]
    pub total_budget: Option<f64>,

    #[command(flatten)]
    pub account: AccountArg,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    /// Line item ID.
    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub account: AccountArg,
}

pub async fn run(command: LineItemCommand, cancel: &CancellationToken) -> anyhow::Result<()> {
    match command {
        LineItemCommand::List(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            let line_items = client
                .list_line_items(&account, args.campaign.as_deref())
                .await?;
            output::print_ok(&line_items);
        }
        LineItemCommand::Create(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            let params = LineItemParams {
                campaign_id: args.campaign,
                name: args.name,
                objective: args.objective,
                product_type: args.product_type,
                placements: args.placements,
                entity_status: args.status,
                bid_amount_local_micro: if args.auto_bid {
                    None
                } else {
                    args.bid.map(dollars_to_micros)
                },
                automatically_select_bid: args.auto_bid.then_some(true),
                bid_type: args.bid_type,
                total_budget_amount_local_micro: args.total_budget.map(dollars_to_micros),
                start_time: args.start_time,
                end_time: args.end_time,
            };
            let line_item = client.create_line_item(&account, &params).await?;
            output::print_ok(&line_item);
        }
        LineItemCommand::Update(args) => {
            let account = context::require_account(args.account.account)?;
            let update = LineItemUpdate {
                name: args.name,
                entity_status: args.status,
                bid_amount_local_micro: if args.auto_bid {
                    None
                } else {
                    args.bid.map(dollars_to_micros)
                },
                automatically_select_bid: args.auto_bid.then_some(true),
                total_budget_amount_local_micro: args.total_budget.map(dollars_to_micros),
            };
            let client = context::build_client(cancel)?;
            let line_item = client.update_line_item(&account, &args.id, &update).await?;
            output::print_ok(&line_item);
        }
        LineItemCommand::Pause(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            let line_item = client.pause_line_item(&account, &args.id).await?;
            output::print_ok(&line_item);
        }
        LineItemCommand::Remove(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            client.delete_line_item(&account, &args.id).await?;
            output::print_ok(&json!({ "id": args.id, "deleted": true }));
        }
    }
    Ok(())
}
