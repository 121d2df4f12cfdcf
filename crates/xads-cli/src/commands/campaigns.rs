//! `x-ads campaigns`: campaign CRUD.

use clap::{Args, Subcommand};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use xads_client::{CampaignParams, CampaignUpdate};

use super::AccountArg;
use crate::context::{self, dollars_to_micros};
use crate::output;

#[derive(Debug, Subcommand)]
pub enum CampaignCommand {
    /// List campaigns for an ad account.
    List(AccountArg),

    /// Create a new campaign.
    Create(CreateArgs),

    /// Update an existing campaign.
    Update(UpdateArgs),

    /// Pause a campaign.
    Pause(IdArgs),

    /// Remove (soft-delete) a campaign.
    Remove(IdArgs),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Campaign name.
    #[arg(long)]
    pub name: String,

    /// Funding instrument ID.
    #[arg(long)]
    pub funding: String,

    /// Daily budget in USD.
    #[arg(long)]
    pub budget: Option<f64>,

    /// Total/lifetime budget in USD.
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
    /// Campaign ID.
    #[arg(long)]
    pub id: String,

    /// New campaign name.
    #[arg(long)]
    pub name: Option<String>,

    /// Entity status: ACTIVE, PAUSED, or DRAFT.
    #[arg(long)]
    pub status: Option<String>,

    /// Daily budget in USD.
    #[arg(long)]
    pub budget: Option<f64>,

    /// Total/lifetime budget in USD.
    #[arg(long = "total-budget")]
    pub total_budget: Option<f64>,

    #[command(flatten)]
    pub account: AccountArg,
}

#[derive(Debug, Args)]
pub struct IdArgs {
    /// Campaign ID.
    #[arg(long)]
    pub id: String,

    #[command(flatten)]
    pub account: AccountArg,
}

pub async fn run(command: CampaignCommand, cancel: &CancellationToken) -> anyhow::Result<()> {
    match command {
        CampaignCommand::List(args) => {
            let account = context::require_account(args.account)?;
            let client = context::build_client(cancel)?;
            let campaigns = client.list_campaigns(&account).await?;
            output::print_ok(&campaigns);
        }
        CampaignCommand::Create(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            let params = CampaignParams {
                name: args.name,
                funding_instrument_id: args.funding,
                entity_status: args.status,
                daily_budget_amount_local_micro: args.budget.map(dollars_to_micros),
                total_budget_amount_local_micro: args.total_budget.map(dollars_to_micros),
                start_time: args.start_time,
                end_time: args.end_time,
            };
            let campaign = client.create_campaign(&account, &params).await?;
            output::print_ok(&campaign);
        }
        CampaignCommand::Update(args) => {
            let account = context::require_account(args.account.account)?;
            let update = CampaignUpdate {
                name: args.name,
                entity_status: args.status,
                daily_budget_amount_local_micro: args.budget.map(dollars_to_micros),
                total_budget_amount_local_micro: args.total_budget.map(dollars_to_micros),
            };
            anyhow::ensure!(
                !update.is_empty(),
                "no update fields provided: use --name, --status, --budget, or --total-budget"
            );
            let client = context::build_client(cancel)?;
            let campaign = client.update_campaign(&account, &args.id, &update).await?;
            output::print_ok(&campaign);
        }
        CampaignCommand::Pause(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            let campaign = client.pause_campaign(&account, &args.id).await?;
            output::print_ok(&campaign);
        }
        CampaignCommand::Remove(args) => {
            let account = context::require_account(args.account.account)?;
            let client = context::build_client(cancel)?;
            client.delete_campaign(&account, &args.id).await?;
            output::print_ok(&json!({ "id": args.id, "deleted": true }));
        }
    }
    Ok(())
}
