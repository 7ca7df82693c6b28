//! Rebalance schedule replay
//!
//! Walks loaded bars day by day the way a host calendar would: every distinct
//! bar timestamp is offered to `should_rebalance`, and on rebalance days the
//! strategy's allocation for the point-in-time snapshot is recorded. No fills
//! or PnL are simulated.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::{debug, info};

use crate::data::snapshot_at;
use crate::error::StrategyError;
use crate::strategies::Strategy;
use crate::{Candle, Symbol, TargetAllocation};

/// Allocation produced on one rebalance day
#[derive(Debug, Clone, PartialEq)]
pub struct RebalanceEvent {
    pub datetime: DateTime<Utc>,
    pub allocation: TargetAllocation,
}

#[derive(Debug, Serialize)]
struct ScheduleRow<'a> {
    date: String,
    rank: usize,
    symbol: &'a str,
    weight: f64,
}

/// Replay the host calendar over `data` and collect every rebalance
pub fn rebalance_schedule(
    strategy: &dyn Strategy,
    data: &HashMap<Symbol, Vec<Candle>>,
) -> Result<Vec<RebalanceEvent>, StrategyError> {
    let ticks: BTreeSet<DateTime<Utc>> = data
        .values()
        .flat_map(|candles| candles.iter().map(|c| c.datetime))
        .collect();

    let mut events = Vec::new();
    for tick in ticks {
        let snapshot = snapshot_at(data, tick);
        if !strategy.should_rebalance(&snapshot)? {
            continue;
        }
        debug!(timestamp = %snapshot.timestamp, "Rebalance day");
        events.push(RebalanceEvent {
            datetime: tick,
            allocation: strategy.run(&snapshot),
        });
    }

    info!(rebalances = events.len(), "Schedule replay finished");
    Ok(events)
}

/// Write the schedule as `date,rank,symbol,weight` rows
pub fn write_schedule_csv(path: impl AsRef<Path>, events: &[RebalanceEvent]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for event in events {
        let date = event.datetime.format("%Y-%m-%d").to_string();
        for (rank, (symbol, weight)) in event.allocation.iter().enumerate() {
            writer.serialize(ScheduleRow {
                date: date.clone(),
                rank: rank + 1,
                symbol: symbol.as_str(),
                weight: *weight,
            })?;
        }
    }

    writer.flush()?;
    Ok(())
}
