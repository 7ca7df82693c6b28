//! Volatility Ranker Strategy Implementation

use chrono::Datelike;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use tracing::{debug, info, warn};

use crate::error::StrategyError;
use crate::indicators::return_volatility;
use crate::strategies::Strategy;
use crate::{parse_local_datetime, Candle, Interval, MarketData, Symbol, TargetAllocation};

use super::config::VolatilityRankerConfig;

/// Volatility Ranker Strategy
#[derive(Debug, Clone)]
pub struct VolatilityRankerStrategy {
    config: VolatilityRankerConfig,
    universe: Vec<Symbol>,
}

impl VolatilityRankerStrategy {
    pub fn new(config: VolatilityRankerConfig) -> Self {
        let mut universe: Vec<Symbol> = Vec::with_capacity(config.universe.len());
        for ticker in &config.universe {
            let symbol = Symbol::new(ticker);
            if universe.contains(&symbol) {
                warn!(%symbol, "Duplicate ticker in universe, keeping first occurrence");
                continue;
            }
            universe.push(symbol);
        }

        if universe.is_empty() {
            warn!("Empty universe, every allocation will be empty");
        }
        if config.top_n == 0 {
            warn!("top_n is 0, every allocation will be empty");
        } else if config.top_n > universe.len() {
            warn!(
                top_n = config.top_n,
                universe = universe.len(),
                "top_n exceeds universe size, selection is capped at available tickers"
            );
        }

        Self { config, universe }
    }

    pub fn config(&self) -> &VolatilityRankerConfig {
        &self.config
    }

    /// Volatility score for one series, `None` when it cannot be computed
    pub fn compute_volatility(&self, candles: &[Candle]) -> Option<f64> {
        let window = if self.config.enforce_lookback {
            &candles[candles.len().saturating_sub(self.config.lookback_period)..]
        } else {
            candles
        };
        let closes: Vec<f64> = window.iter().map(|c| c.close).collect();
        return_volatility(&closes, self.config.std_dev)
    }

    /// Scored universe tickers, most volatile first
    ///
    /// Tickers absent from `data` or without a score are left out. The sort
    /// is stable, so equal scores keep universe order.
    pub fn rank(&self, data: &MarketData) -> Vec<(Symbol, f64)> {
        let mut scored: Vec<(Symbol, f64)> = self
            .universe
            .iter()
            .filter_map(|symbol| {
                let Some(candles) = data.get(symbol) else {
                    debug!(%symbol, "No data supplied, skipping");
                    return None;
                };
                match self.compute_volatility(candles) {
                    Some(vol) => {
                        debug!(%symbol, bars = candles.len(), volatility = vol, "Scored");
                        Some((symbol.clone(), vol))
                    }
                    None => {
                        debug!(%symbol, bars = candles.len(), "Not enough valid prices to score");
                        None
                    }
                }
            })
            .collect();

        scored.sort_by_key(|(_, vol)| Reverse(OrderedFloat(*vol)));
        scored
    }

    /// True when the timestamp falls on the first day of a month
    ///
    /// The day is read in the timestamp's own offset, not in UTC.
    pub fn is_rebalance_date(&self, timestamp: &str) -> Result<bool, StrategyError> {
        let dt = parse_local_datetime(timestamp).ok_or_else(|| StrategyError::MalformedTimestamp {
            input: timestamp.to_string(),
        })?;
        Ok(dt.day() == 1)
    }
}

impl Strategy for VolatilityRankerStrategy {
    fn name(&self) -> &'static str {
        super::NAME
    }

    fn interval(&self) -> Interval {
        Interval::OneDay
    }

    fn assets(&self) -> &[Symbol] {
        &self.universe
    }

    fn run(&self, data: &MarketData) -> TargetAllocation {
        if self.config.top_n == 0 {
            return TargetAllocation::empty();
        }

        // Divide by the configured slot count, not the number selected:
        // an under-filled selection leaves the remainder unallocated.
        let weight = 1.0 / self.config.top_n as f64;
        let selected: Vec<(Symbol, f64)> = self
            .rank(data)
            .into_iter()
            .take(self.config.top_n)
            .map(|(symbol, _)| (symbol, weight))
            .collect();

        if selected.len() < self.config.top_n {
            debug!(
                selected = selected.len(),
                top_n = self.config.top_n,
                "Fewer ranked tickers than slots"
            );
        }

        let allocation = TargetAllocation::new(selected);
        info!(
            timestamp = %data.timestamp,
            holdings = allocation.len(),
            total_weight = allocation.total_weight(),
            "Computed target allocation"
        );
        allocation
    }

    fn should_rebalance(&self, data: &MarketData) -> Result<bool, StrategyError> {
        self.is_rebalance_date(&data.timestamp)
    }

    fn scores(&self, data: &MarketData) -> Vec<(Symbol, f64)> {
        self.rank(data)
    }
}
