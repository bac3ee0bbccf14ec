use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{transport, GameController};
use tracing_subscriber::EnvFilter;

mod app;
mod config;
mod input;
mod view;

use config::{load_roster, load_settings};

/// Terminal detective client for the Midnight Circus interrogation server.
#[derive(Parser, Debug)]
struct Args {
    /// Base url of the game server (http, https, ws or wss).
    #[arg(long)]
    server_url: Option<String>,
    /// Config file; defaults to ./client.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    /// TOML file with `[[suspects]]` entries replacing the built-in cast.
    #[arg(long)]
    roster: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    if let Some(roster) = args.roster {
        settings.roster_path = Some(roster);
    }

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let roster = load_roster(settings.roster_path.as_deref())?;
    let conn = transport::connect(&settings.server_url)
        .await
        .with_context(|| format!("could not reach game server at {}", settings.server_url))?;

    let game = GameController::new(roster, conn.sender());
    app::run(app::App::new(game), conn).await
}
