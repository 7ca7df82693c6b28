//! Check-date command implementation

use anyhow::Result;
use volatility_ranker::{Config, MarketData};

pub fn run(config_path: String, timestamp: String) -> Result<()> {
    let config = Config::from_file(&config_path)?;
    let strategy = super::load_strategy(&config)?;

    let rebalance = strategy.should_rebalance(&MarketData::new(timestamp.as_str()))?;
    println!("{} -> rebalance: {}", timestamp, rebalance);

    Ok(())
}
