//! Integration tests for the volatility ranker
//!
//! These tests drive the strategy through its public host-facing surface.

use approx::assert_relative_eq;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::json;
use std::collections::HashMap;

use volatility_ranker::data::snapshot_at;
use volatility_ranker::schedule::rebalance_schedule;
use volatility_ranker::strategies::volatility_ranker::{
    VolatilityRankerConfig, VolatilityRankerStrategy,
};
use volatility_ranker::strategies::{create_strategy, Strategy};
use volatility_ranker::{Candle, Config, MarketData, StrategyError, Symbol};

// =============================================================================
// Test Utilities
// =============================================================================

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

/// Generate mock candles whose closes move by a repeating pattern scaled by `volatility`
fn generate_mock_candles(count: usize, base_price: f64, volatility: f64) -> Vec<Candle> {
    let mut candles = Vec::with_capacity(count);
    let mut price = base_price;

    for i in 0..count {
        let change = if i % 3 == 0 {
            volatility
        } else if i % 3 == 1 {
            -volatility * 0.5
        } else {
            -volatility * 0.4
        };
        price *= 1.0 + change;

        candles.push(Candle {
            datetime: start_time() + Duration::days(i as i64),
            open: price,
            high: price * (1.0 + volatility),
            low: price * (1.0 - volatility),
            close: price,
            volume: 1000.0 + (i as f64 * 10.0),
        });
    }

    candles
}

fn strategy(universe: &[&str], top_n: usize) -> VolatilityRankerStrategy {
    VolatilityRankerStrategy::new(VolatilityRankerConfig {
        universe: universe.iter().map(|s| s.to_string()).collect(),
        top_n,
        ..Default::default()
    })
}

fn tickers(alloc: &volatility_ranker::TargetAllocation) -> Vec<String> {
    alloc.symbols().map(|s| s.to_string()).collect()
}

// =============================================================================
// Allocation Tests
// =============================================================================

#[test]
fn test_selects_most_volatile_and_skips_unscorable() {
    let s = strategy(&["A", "B", "C", "D"], 2);
    let data = MarketData::new("2024-03-01")
        .with_series("A", generate_mock_candles(40, 100.0, 0.05))
        .with_series("B", generate_mock_candles(40, 100.0, 0.02))
        .with_series("C", generate_mock_candles(40, 100.0, 0.08))
        .with_series("D", generate_mock_candles(1, 100.0, 0.50));

    let alloc = s.run(&data);
    assert_eq!(tickers(&alloc), vec!["C", "A"]);
    assert_eq!(alloc.weight(&Symbol::new("C")), 0.5);
    assert_eq!(alloc.weight(&Symbol::new("A")), 0.5);
    assert_eq!(alloc.weight(&Symbol::new("B")), 0.0);
    assert_eq!(alloc.weight(&Symbol::new("D")), 0.0);
}

#[test]
fn test_under_filled_allocation() {
    let s = strategy(&["A", "B"], 10);
    let data = MarketData::new("2024-03-01")
        .with_series("A", generate_mock_candles(25, 50.0, 0.03))
        .with_series("B", generate_mock_candles(25, 80.0, 0.01));

    let alloc = s.run(&data);
    assert_eq!(alloc.len(), 2);
    for (_, weight) in alloc.iter() {
        assert_relative_eq!(*weight, 0.1);
    }
    assert_relative_eq!(alloc.total_weight(), 0.2, epsilon = 1e-12);
}

#[test]
fn test_allocation_properties_hold() {
    let universe = ["AAPL", "MSFT", "AMZN", "META", "GOOGL", "NVDA"];
    for top_n in 1..=8 {
        let s = strategy(&universe, top_n);
        let mut data = MarketData::new("2024-06-03");
        for (i, ticker) in universe.iter().enumerate() {
            // Odd entries have too little history to score
            let bars = if i % 2 == 0 { 30 } else { 1 + i % 2 };
            data = data.with_series(*ticker, generate_mock_candles(bars, 100.0, 0.01 * (i + 1) as f64));
        }
        data = data.with_series("NOT_IN_UNIVERSE", generate_mock_candles(30, 100.0, 0.5));

        let alloc = s.run(&data);
        assert!(alloc.len() <= top_n);
        assert!(alloc.symbols().all(|sym| s.assets().contains(sym)));
        assert!(alloc.iter().all(|(_, w)| *w == 1.0 / top_n as f64));
        assert!(alloc.total_weight() <= 1.0 + 1e-12);
    }
}

#[test]
fn test_run_is_deterministic() {
    let s = strategy(&["A", "B", "C", "D", "E"], 3);
    let data = MarketData::new("2024-03-01")
        .with_series("A", generate_mock_candles(30, 100.0, 0.02))
        .with_series("B", generate_mock_candles(30, 100.0, 0.02))
        .with_series("C", generate_mock_candles(30, 100.0, 0.04))
        .with_series("D", generate_mock_candles(30, 100.0, 0.02))
        .with_series("E", generate_mock_candles(30, 100.0, 0.01));

    let first = s.run(&data);
    for _ in 0..10 {
        assert_eq!(s.run(&data), first);
    }
    // C leads, then the A/B/D tie resolves in universe order
    assert_eq!(tickers(&first), vec!["C", "A", "B"]);
}

#[test]
fn test_empty_inputs() {
    let s = strategy(&["A", "B"], 2);
    assert!(s.run(&MarketData::new("2024-03-01")).is_empty());

    let empty_universe = strategy(&[], 3);
    let data = MarketData::new("2024-03-01").with_series("A", generate_mock_candles(30, 100.0, 0.02));
    assert!(empty_universe.run(&data).is_empty());
}

#[test]
fn test_zero_close_does_not_poison_score() {
    let s = strategy(&["A", "B"], 1);
    let mut a = generate_mock_candles(30, 100.0, 0.01);
    a[10].close = 0.0;
    let data = MarketData::new("2024-03-01")
        .with_series("A", a)
        .with_series("B", generate_mock_candles(30, 100.0, 0.02));

    let scores = s.scores(&data);
    assert_eq!(scores.len(), 2);
    assert!(scores.iter().all(|(_, v)| v.is_finite()));
}

// =============================================================================
// Rebalance Predicate Tests
// =============================================================================

#[test]
fn test_should_rebalance_first_of_month_only() {
    let s = strategy(&["A"], 1);
    let mut day = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    for _ in 0..366 {
        let data = MarketData::new(day.format("%Y-%m-%d").to_string());
        let expected = day.format("%d").to_string() == "01";
        assert_eq!(s.should_rebalance(&data).unwrap(), expected, "{}", data.timestamp);
        day += Duration::days(1);
    }
}

#[test]
fn test_should_rebalance_reads_day_in_timestamp_offset() {
    let s = strategy(&["A"], 1);
    let cases = [
        ("2024-03-01T00:30:00+09:00", true),
        ("2024-03-01T23:00:00-05:00", true),
        ("2024-03-02T01:00:00+05:00", false),
        ("2024-03-01T12:00:00Z", true),
    ];
    for (ts, expected) in cases {
        assert_eq!(s.should_rebalance(&MarketData::new(ts)).unwrap(), expected, "{}", ts);
    }
}

#[test]
fn test_should_rebalance_surfaces_parse_errors() {
    let s = strategy(&["A"], 1);
    for bad in ["", "yesterday", "2024-13-01", "2024/03/01"] {
        let err = s.should_rebalance(&MarketData::new(bad)).unwrap_err();
        assert!(matches!(err, StrategyError::MalformedTimestamp { .. }), "{}", bad);
    }
}

// =============================================================================
// Host Harness Tests
// =============================================================================

#[test]
fn test_strategy_from_config_and_schedule() {
    let config = Config::from_value(json!({
        "strategy": {
            "name": "volatility_ranker",
            "universe": ["LOW", "MID", "HIGH"],
            "top_n": 2
        }
    }))
    .unwrap();
    let strategy = create_strategy(&config).unwrap();
    assert_eq!(strategy.data().len(), 3);

    let mut bars = HashMap::new();
    bars.insert(Symbol::new("LOW"), generate_mock_candles(100, 100.0, 0.005));
    bars.insert(Symbol::new("MID"), generate_mock_candles(100, 100.0, 0.02));
    bars.insert(Symbol::new("HIGH"), generate_mock_candles(100, 100.0, 0.06));

    // 2024-01-01 .. 2024-04-09: Jan 1, Feb 1, Mar 1, Apr 1
    let events = rebalance_schedule(strategy.as_ref(), &bars).unwrap();
    assert_eq!(events.len(), 4);

    // On Jan 1 only one bar exists, so nothing is scorable yet
    assert!(events[0].allocation.is_empty());
    for event in &events[1..] {
        assert_eq!(tickers(&event.allocation), vec!["HIGH", "MID"]);
    }
}

#[test]
fn test_snapshot_is_point_in_time() {
    let mut bars = HashMap::new();
    bars.insert(Symbol::new("A"), generate_mock_candles(60, 100.0, 0.02));

    let as_of = start_time() + Duration::days(9);
    let snapshot = snapshot_at(&bars, as_of);
    let series = snapshot.get(&Symbol::new("A")).unwrap();
    assert_eq!(series.len(), 10);
    assert!(series.iter().all(|c| c.datetime <= as_of));
}
