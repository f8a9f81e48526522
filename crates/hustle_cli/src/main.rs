//! Contraband hustle - terminal entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use hustle_cli::{HustleConfig, rules_text, run_session};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            config,
            seed,
            settle_delay_ms,
            theme,
        } => {
            let config = match config {
                Some(path) => HustleConfig::from_file(path)?,
                None => HustleConfig::default(),
            }
            .with_overrides(seed, settle_delay_ms, theme);
            run_play(config).await
        }
        Command::Rules { theme } => {
            print!("{}", rules_text(theme));
            Ok(())
        }
    }
}

/// Run an interactive terminal session
#[instrument(skip(config))]
async fn run_play(config: HustleConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        settle_delay_ms = config.settle_delay_ms(),
        theme = ?config.theme(),
        "Starting hustle"
    );

    let controller = config.controller();
    run_session(controller, *config.theme()).await
}
