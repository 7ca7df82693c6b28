//! Schedule command implementation

use anyhow::Result;
use itertools::Itertools;
use tracing::info;
use volatility_ranker::schedule::{rebalance_schedule, write_schedule_csv};
use volatility_ranker::Config;

pub fn run(config_path: String, output: Option<String>) -> Result<()> {
    let config = Config::from_file(&config_path)?;
    info!("Loaded configuration from: {}", config_path);

    let strategy = super::load_strategy(&config)?;
    let bars = super::load_strategy_data(&config, strategy.as_ref())?;

    let events = rebalance_schedule(strategy.as_ref(), &bars)?;

    println!("\n{}", "=".repeat(60));
    println!("REBALANCE SCHEDULE ({} rebalances)", events.len());
    println!("{}", "=".repeat(60));
    for event in &events {
        let holdings = event
            .allocation
            .iter()
            .map(|(symbol, weight)| format!("{}:{:.1}%", symbol, weight * 100.0))
            .join(" ");
        println!(
            "{}  {}",
            event.datetime.format("%Y-%m-%d"),
            if holdings.is_empty() { "(cash)".to_string() } else { holdings }
        );
    }
    println!("{}", "=".repeat(60));

    if let Some(path) = output {
        write_schedule_csv(&path, &events)?;
        info!("Schedule written to: {}", path);
    }

    Ok(())
}
