pub mod check_date;
pub mod rank;
pub mod schedule;

use anyhow::Result;
use std::collections::HashMap;
use tracing::info;
use volatility_ranker::strategies::{self, Strategy};
use volatility_ranker::{data, Candle, Config, Symbol};

/// Load bars for every asset the strategy declares
fn load_strategy_data(
    config: &Config,
    strategy: &dyn Strategy,
) -> Result<HashMap<Symbol, Vec<Candle>>> {
    info!("Loading data from: {}", config.data.data_dir);
    let symbols: Vec<Symbol> = strategy.data().into_iter().map(|req| req.symbol).collect();
    let loaded = data::load_multi_symbol(&config.data.data_dir, &symbols, &config.data.timeframe)?;
    info!("Loaded data for {}/{} symbols", loaded.len(), symbols.len());
    Ok(loaded)
}

fn load_strategy(config: &Config) -> Result<Box<dyn Strategy>> {
    let strategy = strategies::create_strategy(config)?;
    info!(
        strategy = strategy.name(),
        interval = %strategy.interval(),
        assets = strategy.assets().len(),
        "Created strategy"
    );
    Ok(strategy)
}
