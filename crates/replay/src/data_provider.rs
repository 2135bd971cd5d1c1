//! Point-in-time market data for replays.
//!
//! All lookups return the most recent bar AT or BEFORE the requested
//! timestamp, never data from the future. Bars older than the lookback
//! window are treated as absent rather than served stale.

use std::collections::HashMap;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use odte_core::events::MarketSnapshot;
use odte_core::traits::MarketDataProvider;
use rust_decimal::Decimal;

/// Default maximum lookback window in seconds.
///
/// If no bar exists within this window before the requested timestamp,
/// `None` is returned to avoid acting on stale data.
pub const DEFAULT_MAX_LOOKBACK_SECONDS: i64 = 300;

/// A single OHLCV bar.
#[derive(Debug, Clone)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: Decimal,
}

/// In-memory bar storage with per-day volatility index levels.
///
/// Bars are held sorted by timestamp per symbol, so point-in-time lookups
/// are a binary search.
pub struct BarStore {
    bars: HashMap<String, Vec<Bar>>,
    vix_levels: HashMap<NaiveDate, f64>,
    max_lookback: Duration,
}

impl BarStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            vix_levels: HashMap::new(),
            max_lookback: Duration::seconds(DEFAULT_MAX_LOOKBACK_SECONDS),
        }
    }

    /// Overrides the staleness window.
    #[must_use]
    pub fn with_lookback(mut self, max_lookback: Duration) -> Self {
        self.max_lookback = max_lookback;
        self
    }

    /// Loads bars from a CSV file with rows of
    /// `timestamp,symbol,open,high,low,close,volume`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The CSV file cannot be opened
    /// - The CSV file has invalid format
    /// - Timestamp parsing fails
    /// - Decimal parsing fails for OHLCV values
    pub fn load_csv(&mut self, path: &str) -> Result<()> {
        let mut reader = csv::Reader::from_path(path)?;

        for result in reader.records() {
            let record = result?;
            let timestamp: DateTime<Utc> = record[0].parse()?;
            let symbol = record[1].to_string();
            let bar = Bar {
                timestamp,
                symbol: symbol.clone(),
                open: Decimal::from_str(&record[2])?,
                high: Decimal::from_str(&record[3])?,
                low: Decimal::from_str(&record[4])?,
                close: Decimal::from_str(&record[5])?,
                volume: Decimal::from_str(&record[6])?,
            };
            self.bars.entry(symbol).or_default().push(bar);
        }

        self.sort_bars();
        Ok(())
    }

    /// Adds a bar directly (test and programmatic setup path).
    pub fn push_bar(&mut self, bar: Bar) {
        self.bars.entry(bar.symbol.clone()).or_default().push(bar);
        self.sort_bars();
    }

    /// Sets the volatility index level for a trading day.
    pub fn set_vix_level(&mut self, day: NaiveDate, level: f64) {
        self.vix_levels.insert(day, level);
    }

    fn sort_bars(&mut self) {
        for bars in self.bars.values_mut() {
            bars.sort_by_key(|b| b.timestamp);
        }
    }

    /// The most recent bar at or before `at` within the lookback window.
    fn bar_at(&self, symbol: &str, at: DateTime<Utc>) -> Option<&Bar> {
        let bars = self.bars.get(symbol)?;
        let idx = bars.partition_point(|b| b.timestamp <= at);
        if idx == 0 {
            return None;
        }

        let bar = &bars[idx - 1];
        if at - bar.timestamp > self.max_lookback {
            return None;
        }
        Some(bar)
    }
}

impl Default for BarStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataProvider for BarStore {
    async fn snapshot(&self, symbol: &str, at: DateTime<Utc>) -> Result<Option<MarketSnapshot>> {
        let Some(bar) = self.bar_at(symbol, at) else {
            return Ok(None);
        };
        // A day without a volatility level cannot be evaluated: treated as
        // data unavailability, not an error.
        let Some(vix) = self.vix_levels.get(&at.date_naive()).copied() else {
            return Ok(None);
        };

        Ok(Some(MarketSnapshot {
            symbol: symbol.to_string(),
            price: bar.close,
            vix,
            time_of_day: at.time(),
            timestamp: at,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn bar(symbol: &str, at: DateTime<Utc>, close: Decimal) -> Bar {
        Bar {
            timestamp: at,
            symbol: symbol.to_string(),
            open: close,
            high: close,
            low: close,
            close,
            volume: dec!(1000),
        }
    }

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 16, h, m, 0).unwrap()
    }

    fn store_with_bar() -> BarStore {
        let mut store = BarStore::new();
        store.push_bar(bar("SPY", ts(10, 0), dec!(590)));
        store.set_vix_level(NaiveDate::from_ymd_opt(2025, 12, 16).unwrap(), 16.0);
        store
    }

    #[tokio::test]
    async fn snapshot_uses_bar_at_or_before_timestamp() {
        let store = store_with_bar();
        let snap = store.snapshot("SPY", ts(10, 2)).await.unwrap().unwrap();
        assert_eq!(snap.price, dec!(590));
        assert_eq!(snap.time_of_day, ts(10, 2).time());
    }

    #[tokio::test]
    async fn snapshot_never_reads_future_bars() {
        let store = store_with_bar();
        // The only bar is at 10:00; asking at 9:58 must find nothing.
        assert!(store.snapshot("SPY", ts(9, 58)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn stale_bars_outside_lookback_are_absent() {
        let store = store_with_bar();
        // 10:00 bar is more than 5 minutes before 10:06.
        assert!(store.snapshot("SPY", ts(10, 6)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_symbol_has_no_snapshot() {
        let store = store_with_bar();
        assert!(store.snapshot("IWM", ts(10, 0)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_vix_level_means_no_snapshot() {
        let mut store = BarStore::new();
        store.push_bar(bar("SPY", ts(10, 0), dec!(590)));
        assert!(store.snapshot("SPY", ts(10, 0)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn most_recent_eligible_bar_wins() {
        let mut store = store_with_bar();
        store.push_bar(bar("SPY", ts(10, 1), dec!(591)));
        let snap = store.snapshot("SPY", ts(10, 3)).await.unwrap().unwrap();
        assert_eq!(snap.price, dec!(591));
    }
}
