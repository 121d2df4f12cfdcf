//! `x-ads funding`: funding instruments.

use clap::Subcommand;
use tokio_util::sync::CancellationToken;

use super::AccountArg;
use crate::context;
use crate::output;

#[derive(Debug, Subcommand)]
pub enum FundingCommand {
    /// List funding instruments for an ad account.
    List(AccountArg),
}

pub async fn run(command: FundingCommand, cancel: &CancellationToken) -> anyhow::Result<()> {
    match command {
        FundingCommand::List(args) => {
            let account = context::require_account(args.account)?;
            let client = context::build_client(cancel)?;
            let instruments = client.list_funding_instruments(&account).await?;
            output::print_ok(&instruments);
        }
    }
    Ok(())
}
