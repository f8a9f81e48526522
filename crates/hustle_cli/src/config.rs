//! Host configuration loaded from TOML.

use crate::host::Theme;
use derive_getters::Getters;
use derive_more::{Display, Error};
use hustle_core::{DEFAULT_SETTLE_DELAY, GameController, RandomDealer};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for a terminal session.
///
/// Every key is optional in the file; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct HustleConfig {
    /// Milliseconds between a shuffle starting and the token settling.
    #[serde(default = "default_settle_delay_ms")]
    settle_delay_ms: u64,

    /// Seed for the dealer. Drawn from the OS when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Fallback tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,

    /// Presentation wording.
    #[serde(default)]
    theme: Theme,
}

fn default_settle_delay_ms() -> u64 {
    u64::try_from(DEFAULT_SETTLE_DELAY.as_millis()).unwrap_or(u64::MAX)
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for HustleConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            seed: None,
            log_filter: default_log_filter(),
            theme: Theme::default(),
        }
    }
}

impl HustleConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            settle_delay_ms = config.settle_delay_ms,
            seeded = config.seed.is_some(),
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Applies command-line overrides on top of the loaded values.
    #[instrument(skip(self))]
    pub fn with_overrides(
        mut self,
        seed: Option<u64>,
        settle_delay_ms: Option<u64>,
        theme: Option<Theme>,
    ) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        if let Some(ms) = settle_delay_ms {
            self.settle_delay_ms = ms;
        }
        if let Some(theme) = theme {
            self.theme = theme;
        }
        self
    }

    /// Returns the settle delay as a [`Duration`].
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Builds a controller dealing from the configured seed.
    #[instrument(skip(self), fields(seed = ?self.seed))]
    pub fn controller(&self) -> GameController {
        let delay = self.settle_delay();
        match self.seed {
            Some(seed) => GameController::with_dealer(RandomDealer::seeded(seed), delay),
            None => GameController::with_dealer(RandomDealer::from_os_rng(), delay),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
