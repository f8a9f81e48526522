//! Command-line interface for the hustle binary.

use clap::{Parser, Subcommand};
use hustle_cli::Theme;

/// Contraband hustle - find the goods after the shuffle
#[derive(Parser, Debug)]
#[command(name = "hustle")]
#[command(about = "Find the hidden token among three slots", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive session in the terminal
    Play {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Seed for a reproducible deal
        #[arg(long)]
        seed: Option<u64>,

        /// Milliseconds before a shuffle settles
        #[arg(long)]
        settle_delay_ms: Option<u64>,

        /// Table wording
        #[arg(long, value_enum)]
        theme: Option<Theme>,
    },

    /// Print the payout rules
    Rules {
        /// Table wording
        #[arg(long, value_enum, default_value_t = Theme::Vice)]
        theme: Theme,
    },
}
