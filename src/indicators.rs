//! Return and volatility calculations
//!
//! Functions take plain close-price slices so they can be reused outside the
//! strategy (reports, tests, other rankers).

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Standard deviation estimator used for volatility scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StdDevKind {
    /// Bessel-corrected (n - 1). Needs at least two returns.
    #[default]
    Sample,
    /// Divides by n. A single return scores 0.0.
    Population,
}

/// Simple period-over-period returns
///
/// `r_i = (c_i - c_{i-1}) / c_{i-1}`. Non-finite results (zero or NaN prior
/// close) are dropped, so the output may be shorter than `closes.len() - 1`.
pub fn pct_change(closes: &[f64]) -> Vec<f64> {
    closes
        .windows(2)
        .map(|w| (w[1] - w[0]) / w[0])
        .filter(|r| r.is_finite())
        .collect()
}

/// Standard deviation of returns, `None` when it cannot be estimated
pub fn return_volatility(closes: &[f64], kind: StdDevKind) -> Option<f64> {
    let returns = pct_change(closes);
    if returns.is_empty() {
        return None;
    }

    let sd = match kind {
        StdDevKind::Sample => returns.iter().std_dev(),
        StdDevKind::Population => returns.iter().population_std_dev(),
    };

    sd.is_finite().then_some(sd)
}

/// Scale a daily volatility to annual terms (252 trading days)
pub fn annualize(daily_vol: f64) -> f64 {
    daily_vol * 252f64.sqrt()
}
