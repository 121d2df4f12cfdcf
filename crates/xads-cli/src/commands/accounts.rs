//! `x-ads accounts`: list accessible ad accounts.

use tokio_util::sync::CancellationToken;

use crate::context;
use crate::output;

pub async fn run(cancel: &CancellationToken) -> anyhow::Result<()> {
    let client = context::build_client(cancel)?;
    let accounts = client.list_accounts().await?;
    output::print_ok(&accounts);
    Ok(())
}
