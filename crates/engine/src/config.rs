use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::EngineError;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_LOW_STOCK_MAX: u32 = 10;

pub const ENV_DEBOUNCE_MS: &str = "BEADSTASH_DEBOUNCE_MS";
pub const ENV_LOW_STOCK_MAX: &str = "BEADSTASH_LOW_STOCK_MAX";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// SQLite file; in-memory when unset.
    pub database_path: Option<PathBuf>,
    /// Quiet period before a pending quantity is written.
    pub debounce_ms: u64,
    /// Highest quantity still counted as low stock; above it is in stock.
    pub low_stock_max: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            low_stock_max: DEFAULT_LOW_STOCK_MAX,
        }
    }
}

impl EngineConfig {
    /// Reads `path` if it exists, then applies environment overrides.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| {
                EngineError::Config(format!("failed to read {}: {e}", path.display()))
            })?;
            Self::from_toml_str(&contents).map_err(|e| match e {
                EngineError::Config(msg) => {
                    EngineError::Config(format!("failed to parse {}: {msg}", path.display()))
                }
                other => other,
            })?
        } else {
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, EngineError> {
        toml::from_str(contents).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, EngineError> {
        toml::to_string_pretty(self).map_err(|e| EngineError::Config(e.to_string()))
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Invalid values are logged and ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(raw) = lookup(ENV_DEBOUNCE_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.debounce_ms = ms,
                Err(err) => tracing::warn!("invalid {ENV_DEBOUNCE_MS}, ignoring: {err}"),
            }
        }
        if let Some(raw) = lookup(ENV_LOW_STOCK_MAX) {
            match raw.trim().parse::<u32>() {
                Ok(max) => self.low_stock_max = max,
                Err(err) => tracing::warn!("invalid {ENV_LOW_STOCK_MAX}, ignoring: {err}"),
            }
        }
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
