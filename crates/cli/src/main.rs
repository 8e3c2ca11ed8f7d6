//! `thecloud` — a thin command-line front end over the control-plane HTTP
//! API, mirroring `cmd/cloud-cli`'s cobra command tree.

mod commands;
mod config;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use thecloud_sdk::Client;

use commands::{auth::AuthCommand, compute::ComputeCommand};

const DEFAULT_API_URL: &str = "http://localhost:8080";

#[derive(Debug, Parser)]
#[command(name = "thecloud", about = "Command-line client for the thecloud control plane")]
struct Cli {
    /// Base URL of the control-plane API.
    #[arg(long, global = true, default_value = DEFAULT_API_URL, env = "THECLOUD_API_URL")]
    api_url: String,

    /// API key to authenticate with. Falls back to MINIAWS_API_KEY, then
    /// the key saved by `thecloud auth login`/`create-demo`.
    #[arg(short = 'k', long, global = true)]
    api_key: Option<String>,

    /// Emit machine-readable JSON instead of formatted text.
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Authentication and API key management.
    #[command(subcommand)]
    Auth(AuthCommand),
    /// Instance lifecycle management.
    #[command(subcommand)]
    Compute(ComputeCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // `create-demo` and `login` are the bootstrap commands that establish an
    // API key in the first place, so they run with whatever key is on hand
    // (often none) rather than failing resolution up front.
    let bootstrapping = matches!(
        cli.command,
        Command::Auth(AuthCommand::CreateDemo { .. }) | Command::Auth(AuthCommand::Login { .. })
    );

    let api_key = resolve_api_key(cli.api_key.clone());
    if api_key.is_none() && !bootstrapping {
        bail!(
            "no API key found. Pass --api-key, set MINIAWS_API_KEY, or run `thecloud auth login`"
        );
    }

    let client = Client::new(cli.api_url, api_key.unwrap_or_default());

    match cli.command {
        Command::Auth(cmd) => commands::auth::run(cmd, client, cli.json).await,
        Command::Compute(cmd) => commands::compute::run(cmd, client, cli.json).await,
    }
}

/// Resolution order: `--api-key` flag, then `MINIAWS_API_KEY`, then the
/// locally saved config — mirrors `cmd/cloud-cli`'s flag-then-env-then-file
/// precedence, env var name unchanged from the original.
fn resolve_api_key(flag: Option<String>) -> Option<String> {
    flag.or_else(|| std::env::var("MINIAWS_API_KEY").ok())
        .or_else(config::load_api_key)
}
