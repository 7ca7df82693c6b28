//! Core data types shared between the strategy and its host

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Validation errors for candle data
#[derive(Debug, Error)]
pub enum CandleValidationError {
    #[error("high ({high}) must be >= low ({low})")]
    HighLessThanLow { high: f64, low: f64 },

    #[error("volume ({0}) must be >= 0")]
    NegativeVolume(f64),

    #[error("close ({close}) must be between low ({low}) and high ({high})")]
    CloseOutOfRange { close: f64, low: f64, high: f64 },

    #[error("prices must be positive: open={open}, high={high}, low={low}, close={close}")]
    NonPositivePrice {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
}

/// OHLCV bar for one ticker over one interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub datetime: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Create a new candle with validation
    pub fn new(
        datetime: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, CandleValidationError> {
        let candle = Self {
            datetime,
            open,
            high,
            low,
            close,
            volume,
        };
        candle.validate()?;
        Ok(candle)
    }

    /// Close-only bar, used when a host only ships closing prices
    pub fn from_close(datetime: DateTime<Utc>, close: f64) -> Self {
        Self {
            datetime,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    pub fn validate(&self) -> Result<(), CandleValidationError> {
        if self.open <= 0.0 || self.high <= 0.0 || self.low <= 0.0 || self.close <= 0.0 {
            return Err(CandleValidationError::NonPositivePrice {
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            });
        }

        if self.high < self.low {
            return Err(CandleValidationError::HighLessThanLow {
                high: self.high,
                low: self.low,
            });
        }

        if self.volume < 0.0 {
            return Err(CandleValidationError::NegativeVolume(self.volume));
        }

        if self.close < self.low || self.close > self.high {
            return Err(CandleValidationError::CloseOutOfRange {
                close: self.close,
                low: self.low,
                high: self.high,
            });
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Ticker symbol using Arc<str> for cheap cloning
///
/// Symbols are cloned into every allocation and data requirement the
/// strategy hands back to the host.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(#[serde(with = "arc_str_serde")] std::sync::Arc<str>);

mod arc_str_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::sync::Arc;

    pub fn serialize<S>(value: &Arc<str>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Arc<str>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Arc::from(s.as_str()))
    }
}

impl Symbol {
    pub fn new(s: impl AsRef<str>) -> Self {
        Symbol(std::sync::Arc::from(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Symbol::new(s)
    }
}

/// Sampling interval a strategy asks the host to invoke it at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1day")]
    OneDay,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneDay => "1day",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of series the host must prepare for a ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKind {
    Ohlcv,
}

/// Declarative data requirement read by the host before each invocation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataRequirement {
    pub kind: DataKind,
    pub symbol: Symbol,
    pub interval: Interval,
}

impl DataRequirement {
    pub fn ohlcv(symbol: Symbol, interval: Interval) -> Self {
        Self {
            kind: DataKind::Ohlcv,
            symbol,
            interval,
        }
    }
}

/// Per-invocation input supplied by the host
///
/// `timestamp` is kept as the raw host string; strategies parse it when they
/// need a calendar date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketData {
    pub timestamp: String,
    pub series: HashMap<Symbol, Vec<Candle>>,
}

impl MarketData {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            series: HashMap::new(),
        }
    }

    pub fn with_series(mut self, symbol: impl Into<Symbol>, candles: Vec<Candle>) -> Self {
        self.series.insert(symbol.into(), candles);
        self
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&[Candle]> {
        self.series.get(symbol).map(Vec::as_slice)
    }
}

/// Target portfolio weights, kept in selection order
///
/// Tickers not listed are implicitly held at zero weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetAllocation {
    weights: Vec<(Symbol, f64)>,
}

impl TargetAllocation {
    pub fn new(weights: Vec<(Symbol, f64)>) -> Self {
        Self { weights }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Weight for a ticker, zero when not held
    pub fn weight(&self, symbol: &Symbol) -> f64 {
        self.weights
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, w)| *w)
            .unwrap_or(0.0)
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.weights.iter().any(|(s, _)| s == symbol)
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.weights.iter().map(|(s, _)| s)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Symbol, f64)> {
        self.weights.iter()
    }

    pub fn total_weight(&self) -> f64 {
        self.weights.iter().map(|(_, w)| w).sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Parse a host timestamp, keeping the wall-clock time it was written in.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and a bare
/// `YYYY-MM-DD` (midnight). An offset is not applied, so
/// `2024-03-01T00:30:00+09:00` stays on March 1st.
pub fn parse_local_datetime(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if let Ok(dt) = s.parse::<DateTime<FixedOffset>>() {
        return Some(dt.naive_local());
    }
    parse_naive(s)
}

/// Parse a host timestamp as an instant in UTC.
///
/// Same formats as [`parse_local_datetime`]. Offsets are converted to UTC and
/// naive values are taken as UTC.
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if let Ok(dt) = s.parse::<DateTime<FixedOffset>>() {
        return Some(dt.with_timezone(&Utc));
    }
    parse_naive(s).map(|ndt| DateTime::<Utc>::from_naive_utc_and_offset(ndt, Utc))
}

fn parse_naive(s: &str) -> Option<NaiveDateTime> {
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
