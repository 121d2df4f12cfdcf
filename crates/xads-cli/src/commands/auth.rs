//! `x-ads auth`: the three-legged OAuth 1.0a flow.

use std::io::{BufRead, Write};

use clap::{Args, Subcommand};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use xads_oauth::{AuthFlow, AuthFlowConfig, OauthError};

use crate::context;
use crate::output;

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Run the OAuth 1.0a 3-legged flow to obtain access tokens.
    Login(LoginArgs),

    /// Verify stored tokens work and list accessible ad accounts.
    Status,
}

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Consumer key (API key) of your X app.
    #[arg(long, env = "X_CONSUMER_KEY")]
    pub consumer_key: String,

    /// Consumer secret (API secret) of your X app.
    #[arg(long, env = "X_CONSUMER_SECRET")]
    pub consumer_secret: String,
}

pub async fn run(command: AuthCommand) -> anyhow::Result<()> {
    match command {
        AuthCommand::Login(args) => login(args).await,
        AuthCommand::Status => status().await,
    }
}

async fn login(args: LoginArgs) -> anyhow::Result<()> {
    let store = context::credential_store();
    let flow = AuthFlow::new(AuthFlowConfig::new(
        args.consumer_key,
        args.consumer_secret,
    ));

    flow.run(&store, prompt_for_pin).await?;

    output::print_ok(&json!({
        "authenticated": true,
        "credentials_path": store.path(),
    }));
    Ok(())
}

/// Blocking wait on the human authorization step: show the URL, read the
/// PIN from the terminal. An empty line cancels.
fn prompt_for_pin(url: &str) -> Result<String, OauthError> {
    let mut stderr = std::io::stderr();
    let _ = writeln!(stderr, "Open this URL in your browser and authorize the app:");
    let _ = writeln!(stderr, "\n  {url}\n");
    let _ = write!(stderr, "Enter the PIN shown after authorizing: ");
    let _ = stderr.flush();

    let mut pin = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut pin)
        .map_err(|e| OauthError::Denied(format!("could not read verifier: {e}")))?;

    let pin = pin.trim().to_string();
    if pin.is_empty() {
        return Err(OauthError::Denied("no verifier provided".into()));
    }
    Ok(pin)
}

async fn status() -> anyhow::Result<()> {
    let client = context::build_client(&CancellationToken::new())?;
    let accounts = client.list_accounts().await?;

    output::print_ok(&json!({
        "token_valid": true,
        "accounts": accounts,
    }));
    Ok(())
}
