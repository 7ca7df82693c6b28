//! Volatility Ranker Configuration

use serde::{Deserialize, Serialize};

use crate::indicators::StdDevKind;

/// Configuration for the Volatility Ranker strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatilityRankerConfig {
    /// Tickers eligible for selection, in tie-break order.
    /// Placeholder list; real index membership comes from config.
    #[serde(default = "default_universe")]
    pub universe: Vec<String>,

    /// Trailing daily bars used for volatility (default: 20)
    #[serde(default = "default_lookback_period")]
    pub lookback_period: usize,

    /// Number of most volatile tickers to hold (default: 10)
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Only use the trailing `lookback_period` bars (default: false, whole series)
    #[serde(default)]
    pub enforce_lookback: bool,

    /// Standard deviation estimator (default: sample)
    #[serde(default)]
    pub std_dev: StdDevKind,
}

fn default_universe() -> Vec<String> {
    ["AAPL", "MSFT", "AMZN", "META", "GOOGL"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_lookback_period() -> usize { 20 }
fn default_top_n() -> usize { 10 }

impl Default for VolatilityRankerConfig {
    fn default() -> Self {
        Self {
            universe: default_universe(),
            lookback_period: default_lookback_period(),
            top_n: default_top_n(),
            enforce_lookback: false,
            std_dev: StdDevKind::default(),
        }
    }
}
