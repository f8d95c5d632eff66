//! Application configuration.
//!
//! Loaded from YAML; every key is optional.
//!
//! ```yaml
//! snapshot: data/snapshot.json
//! trade_scale: 2
//! log_level: info
//! page_size: 20
//! search:
//!   limit_cap: 50
//! ```

use std::path::{Path, PathBuf};

use rathena_search::SearchConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::DEFAULT_TRADE_SCALE;

/// Rows per list page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdminConfig {
    /// JSON snapshot the repositories load.
    pub snapshot: PathBuf,
    /// Buy price over sell price for items declaring only one of them.
    pub trade_scale: f64,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Rows per list page.
    pub page_size: usize,
    pub search: SearchConfig,
}

impl Default for AdminConfig {
    fn default() -> Self {
        AdminConfig {
            snapshot: PathBuf::from("snapshot.json"),
            trade_scale: DEFAULT_TRADE_SCALE,
            log_level: "info".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            search: SearchConfig::default(),
        }
    }
}

impl AdminConfig {
    /// Reads and validates a YAML config file.
    ///
    /// A relative snapshot path is resolved against the config's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = AdminConfig::from_yaml(&text)?;
        if config.snapshot.is_relative() {
            if let Some(dir) = path.parent() {
                config.snapshot = dir.join(&config.snapshot);
            }
        }
        Ok(config)
    }

    /// Parses and validates YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: AdminConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.trade_scale.is_finite() && self.trade_scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "trade_scale must be a positive number, got {}",
                self.trade_scale
            )));
        }
        if self.page_size == 0 || self.page_size > self.search.limit_cap {
            return Err(ConfigError::Invalid(format!(
                "page_size must be between 1 and the limit cap ({}), got {}",
                self.search.limit_cap, self.page_size
            )));
        }
        Ok(())
    }
}
