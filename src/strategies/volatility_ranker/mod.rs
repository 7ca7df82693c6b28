//! Volatility Ranker Strategy
//!
//! Holds the most volatile names of a fixed equity universe, equally weighted.
//!
//! ## Scoring
//! Each ticker scores the standard deviation of its close-to-close percentage
//! returns. Tickers with too few bars have no score and are never selected.
//!
//! ## Selection
//! 1. Rank scored tickers by volatility, highest first (ties keep universe order)
//! 2. Keep the first `top_n`
//! 3. Weight each at `1 / top_n`; unfilled slots stay in cash
//!
//! ## Rebalancing
//! On the first calendar day of each month.

mod config;
mod strategy;

pub use config::VolatilityRankerConfig;
pub use strategy::VolatilityRankerStrategy;

use crate::error::StrategyError;
use crate::strategies::Strategy;
use crate::Config;
use anyhow::Result;
use tracing::info;

/// Registry key
pub const NAME: &str = "volatility_ranker";

/// Create strategy from config
pub fn create_strategy_from_config(config: &Config) -> Result<VolatilityRankerStrategy> {
    let strategy_config: VolatilityRankerConfig = serde_json::from_value(config.strategy.clone())
        .map_err(|source| StrategyError::InvalidConfig {
            strategy: NAME,
            source,
        })?;
    info!(
        universe = strategy_config.universe.len(),
        lookback_period = strategy_config.lookback_period,
        enforce_lookback = strategy_config.enforce_lookback,
        top_n = strategy_config.top_n,
        std_dev = ?strategy_config.std_dev,
        "Volatility ranker config"
    );
    Ok(VolatilityRankerStrategy::new(strategy_config))
}

/// Registry factory
pub fn create(config: &Config) -> Result<Box<dyn Strategy>> {
    Ok(Box::new(create_strategy_from_config(config)?))
}
