//! Configuration management
//!
//! Loads the JSON configuration file. The `strategy` section is kept as raw
//! JSON and deserialized by whichever strategy the `name` key selects.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Overrides `data.data_dir` when set (also read from `.env`)
pub const DATA_DIR_ENV: &str = "VOLATILITY_RANKER_DATA_DIR";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub strategy: serde_json::Value,
    #[serde(default)]
    pub data: DataConfig,
}

impl Config {
    /// Load configuration from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Config =
            serde_json::from_str(&contents).context("Failed to parse config JSON")?;

        if let Ok(data_dir) = std::env::var(DATA_DIR_ENV) {
            config.data.data_dir = data_dir;
        }

        Ok(config)
    }

    /// Build a config from an in-memory JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).context("Failed to parse config JSON")
    }

    /// Strategy name from the `strategy` section
    pub fn strategy_name(&self) -> Result<String> {
        self.strategy
            .get("name")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .context("'name' is required in the 'strategy' section of config. Example: \"strategy\": { \"name\": \"volatility_ranker\", ... }")
    }

    /// Set a parameter in the strategy section (CLI overrides)
    pub fn set_strategy_param(&mut self, key: &str, value: serde_json::Value) {
        if let Some(obj) = self.strategy.as_object_mut() {
            obj.insert(key.to_string(), value);
        }
    }
}

/// Where the local harness reads bars from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// File suffix: `{SYMBOL}_{timeframe}.csv`
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_timeframe() -> String {
    "1d".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        DataConfig {
            data_dir: default_data_dir(),
            timeframe: default_timeframe(),
        }
    }
}
