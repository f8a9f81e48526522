//! Terminal host for the contraband hustle game.
//!
//! # Architecture
//!
//! - **Config**: TOML settings for settle delay, seed, log filter, and theme
//! - **Host**: parses typed commands, draws the table, renders events

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod host;

pub use config::{ConfigError, HustleConfig};
pub use host::{
    HELP, InputError, PlayerCommand, Theme, execute, render_event, render_table, rules_text,
    run_session,
};
