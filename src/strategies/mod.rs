//! Strategy Module
//!
//! - `Strategy` trait: the contract between a strategy and its host
//! - Strategy registry: name -> factory, so hosts pick strategies from config

pub mod volatility_ranker;

use crate::error::StrategyError;
use crate::{Config, DataRequirement, Interval, MarketData, Symbol, TargetAllocation};
use anyhow::Result;
use itertools::Itertools;
use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

// =============================================================================
// Strategy Trait
// =============================================================================

/// Allocation strategy driven by a host framework.
///
/// The host reads the declarative parts (`interval`, `assets`, `data`) to
/// decide what to prepare and how often to call. On each tick it asks
/// `should_rebalance` and, when true, applies the result of `run`.
/// Implementations must not carry mutable state between calls.
pub trait Strategy: Send + Sync {
    /// Strategy identifier (matches the config's `strategy.name`)
    fn name(&self) -> &'static str;

    /// How often the host should invoke the strategy
    fn interval(&self) -> Interval;

    /// Tickers the strategy may allocate to
    fn assets(&self) -> &[Symbol];

    /// Series the host must supply on every invocation
    fn data(&self) -> Vec<DataRequirement> {
        self.assets()
            .iter()
            .map(|s| DataRequirement::ohlcv(s.clone(), self.interval()))
            .collect()
    }

    /// Compute the target allocation for this tick
    fn run(&self, data: &MarketData) -> TargetAllocation;

    /// Whether the host should rebalance on this tick
    fn should_rebalance(&self, data: &MarketData) -> Result<bool, StrategyError>;

    /// Per-ticker scores behind `run` for this input, best first
    fn scores(&self, data: &MarketData) -> Vec<(Symbol, f64)>;
}

// =============================================================================
// Strategy Registry
// =============================================================================

/// Factory function type for creating strategies from config
pub type StrategyFactory = fn(&Config) -> Result<Box<dyn Strategy>>;

static REGISTRY: OnceLock<RwLock<HashMap<&'static str, StrategyFactory>>> = OnceLock::new();

fn get_registry() -> &'static RwLock<HashMap<&'static str, StrategyFactory>> {
    REGISTRY.get_or_init(|| {
        let mut map = HashMap::new();
        map.insert(
            volatility_ranker::NAME,
            volatility_ranker::create as StrategyFactory,
        );
        RwLock::new(map)
    })
}

/// Create a strategy from configuration
pub fn create_strategy(config: &Config) -> Result<Box<dyn Strategy>> {
    let strategy_name = config.strategy_name()?;

    let factory = {
        let registry = get_registry().read().unwrap_or_else(PoisonError::into_inner);
        match registry.get(strategy_name.as_str()) {
            Some(factory) => *factory,
            None => {
                return Err(StrategyError::UnknownStrategy {
                    name: strategy_name,
                    available: registry.keys().sorted().join(", "),
                }
                .into())
            }
        }
    };

    factory(config)
}

/// Names of all registered strategies, sorted
pub fn available_strategies() -> Vec<&'static str> {
    get_registry()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .keys()
        .copied()
        .sorted()
        .collect()
}

/// Register a new strategy (for plugins or testing)
pub fn register_strategy(name: &'static str, factory: StrategyFactory) {
    get_registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(name, factory);
}
