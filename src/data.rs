//! Data loading for the local harness
//!
//! Loads OHLCV bars from CSV files and cuts point-in-time snapshots, playing
//! the host's role when the strategy is run from the command line.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::{parse_datetime, Candle, MarketData, Symbol};

/// Timestamp format used for harness snapshots
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// CSV Data Loading
// =============================================================================

/// Load OHLCV data from CSV file
///
/// Expected columns: `datetime,open,high,low,close,volume` with a header row.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Candle>> {
    let mut reader = csv::Reader::from_path(path.as_ref()).context("Failed to open CSV file")?;

    let mut candles = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read row {}", row_idx + 1))?;

        let dt_str = record.get(0).context("Missing datetime column")?;
        let datetime = parse_datetime(dt_str)
            .with_context(|| format!("Failed to parse datetime: {}", dt_str))?;

        let field = |idx: usize, name: &str| -> Result<f64> {
            record
                .get(idx)
                .with_context(|| format!("Missing {} column", name))?
                .trim()
                .parse::<f64>()
                .with_context(|| format!("Failed to parse {} on row {}", name, row_idx + 1))
        };

        candles.push(Candle {
            datetime,
            open: field(1, "open")?,
            high: field(2, "high")?,
            low: field(3, "low")?,
            close: field(4, "close")?,
            volume: field(5, "volume")?,
        });
    }

    Ok(candles)
}

/// Load data for multiple symbols from `{SYMBOL}_{timeframe}.csv` files
///
/// Missing files are skipped with a warning; the strategy treats an absent
/// ticker as unscored.
pub fn load_multi_symbol(
    data_dir: impl AsRef<Path>,
    symbols: &[Symbol],
    timeframe: &str,
) -> Result<HashMap<Symbol, Vec<Candle>>> {
    let mut data = HashMap::new();

    for symbol in symbols {
        let filename = format!("{}_{}.csv", symbol.as_str(), timeframe);
        let path = data_dir.as_ref().join(&filename);

        if !path.exists() {
            warn!("Data file not found: {}", path.display());
            continue;
        }

        let mut candles =
            load_csv(&path).with_context(|| format!("Failed to load data for {}", symbol))?;

        let validation = validate_candles(&candles);
        for warning in &validation.warnings {
            warn!(%symbol, "{}", warning);
        }
        for error in &validation.errors {
            warn!(%symbol, "{}", error);
        }
        candles.sort_by_key(|c| c.datetime);

        info!("Loaded {} candles for {}", candles.len(), symbol);
        data.insert(symbol.clone(), candles);
    }

    if data.is_empty() {
        anyhow::bail!("No data loaded for any symbol");
    }

    Ok(data)
}

// =============================================================================
// Snapshots
// =============================================================================

/// Point-in-time view of the loaded data
///
/// Every series is cut to bars at or before `as_of`; tickers with no bars
/// by then are left out. Series must be sorted by datetime.
pub fn snapshot_at(data: &HashMap<Symbol, Vec<Candle>>, as_of: DateTime<Utc>) -> MarketData {
    let mut snapshot = MarketData::new(as_of.format(SNAPSHOT_TIMESTAMP_FORMAT).to_string());
    for (symbol, candles) in data {
        let end = candles.partition_point(|c| c.datetime <= as_of);
        if end > 0 {
            snapshot.series.insert(symbol.clone(), candles[..end].to_vec());
        }
    }
    snapshot
}

/// Latest bar timestamp across all series
pub fn latest_datetime(data: &HashMap<Symbol, Vec<Candle>>) -> Option<DateTime<Utc>> {
    data.values().filter_map(|c| c.last()).map(|c| c.datetime).max()
}

// =============================================================================
// Data Validation
// =============================================================================

/// Validate candle data for consistency
pub fn validate_candles(candles: &[Candle]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if candles.is_empty() {
        errors.push("No candles provided".to_string());
        return ValidationResult { errors, warnings };
    }

    for (i, candle) in candles.iter().enumerate() {
        if let Err(e) = candle.validate() {
            errors.push(format!("Candle {}: {}", i, e));
        }
        if i > 0 && candle.datetime <= candles[i - 1].datetime {
            warnings.push(format!("Candle {}: not chronological", i));
        }
    }

    ValidationResult { errors, warnings }
}

/// Result of data validation
#[derive(Debug)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
