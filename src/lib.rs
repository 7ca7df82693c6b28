//! Volatility Ranker
//!
//! Ranks a fixed equity universe by trailing return volatility and holds the
//! top N names at equal weight, rebalancing on the first day of each month.
//!
//! The crate is a strategy plugin: a host framework supplies bars, asks
//! whether to rebalance, and applies the returned allocation.
//!
//! ```no_run
//! use volatility_ranker::strategies::volatility_ranker::{
//!     VolatilityRankerConfig, VolatilityRankerStrategy,
//! };
//! use volatility_ranker::{MarketData, Strategy};
//!
//! let strategy = VolatilityRankerStrategy::new(VolatilityRankerConfig::default());
//! let data = MarketData::new("2024-03-01");
//! if strategy.should_rebalance(&data).unwrap() {
//!     let allocation = strategy.run(&data);
//!     println!("{} holdings", allocation.len());
//! }
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod schedule;
pub mod strategies;
pub mod types;

pub use config::Config;
pub use error::StrategyError;
pub use strategies::Strategy;
pub use types::*;
