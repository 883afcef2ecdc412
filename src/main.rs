use anyhow::Context;
use clap::Parser;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chainbot::config::ConfigManager;

mod cli;

use cli::{Args, Commands, commands};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(args).await {
        error!("Error: {:#}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    info!("⛓️  chainbot v{}", env!("CARGO_PKG_VERSION"));

    let manager = match &args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    let config = manager
        .load_config()
        .await
        .context("failed to load configuration")?;

    match args.command {
        Commands::Chat => commands::chat::handle_chat(&config).await?,
        Commands::Auto { interval } => commands::auto::handle_auto(&config, interval).await?,
        Commands::Tools => commands::tools::handle_tools().await?,
        Commands::Call { tool, args } => commands::call::handle_call(&config, tool, args).await?,
        Commands::Wallet => commands::wallet::handle_wallet(&config).await?,
        Commands::Config { action } => {
            commands::config::handle_config(&manager, &config, action).await?
        }
    }

    Ok(())
}
