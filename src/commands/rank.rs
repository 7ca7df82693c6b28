//! Rank command implementation

use anyhow::{Context, Result};
use tracing::{info, warn};
use volatility_ranker::indicators::annualize;
use volatility_ranker::{data, parse_datetime, Config};

pub fn run(config_path: String, date: Option<String>, top_n_override: Option<usize>) -> Result<()> {
    let mut config = Config::from_file(&config_path)?;
    info!("Loaded configuration from: {}", config_path);

    if let Some(top_n) = top_n_override {
        info!("Overriding top_n to: {}", top_n);
        config.set_strategy_param("top_n", serde_json::json!(top_n));
    }

    let strategy = super::load_strategy(&config)?;
    let bars = super::load_strategy_data(&config, strategy.as_ref())?;

    let as_of = match date {
        Some(d) => parse_datetime(&d).with_context(|| format!("Invalid --date: {}", d))?,
        None => data::latest_datetime(&bars).context("Loaded data has no bars")?,
    };
    let snapshot = data::snapshot_at(&bars, as_of);

    let rebalance = strategy.should_rebalance(&snapshot)?;
    let scores = strategy.scores(&snapshot);
    let allocation = strategy.run(&snapshot);

    println!("\n{}", "=".repeat(60));
    println!("VOLATILITY RANKING AS OF {}", snapshot.timestamp);
    println!("{}", "=".repeat(60));
    println!("Rebalance day:      {}", if rebalance { "yes" } else { "no" });
    println!("Scored tickers:     {}/{}", scores.len(), strategy.assets().len());
    println!();
    if scores.is_empty() {
        warn!(strategy = strategy.name(), "No tickers could be scored for this snapshot");
        println!("No tickers could be scored (missing or too-short series)");
    }
    println!("{:<6} {:<10} {:>12} {:>12} {:>8}", "Rank", "Ticker", "Daily Vol", "Annual Vol", "Weight");
    for (i, (symbol, vol)) in scores.iter().enumerate() {
        let weight = allocation.weight(symbol);
        println!(
            "{:<6} {:<10} {:>11.4}% {:>11.2}% {:>7.2}%",
            i + 1,
            symbol.as_str(),
            vol * 100.0,
            annualize(*vol) * 100.0,
            weight * 100.0
        );
    }
    println!("{}", "-".repeat(60));
    println!("Total allocated:    {:.2}%", allocation.total_weight() * 100.0);
    println!("{}", "=".repeat(60));

    Ok(())
}
