mod app;
mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tubefetch::config::Config;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error + Send + Sync>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let code = match cli.command {
        Commands::Download(args) => app::download(&config, args).await?,
        Commands::Info(args) => app::info(&config, args).await?,
        Commands::Status(args) => app::status(&config, args).await?,
        Commands::Health => app::health(&config).await?,
        Commands::Theme { action } => app::theme(&config, action)?,
    };

    Ok(code)
}
