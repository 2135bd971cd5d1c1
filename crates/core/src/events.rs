use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Underlying market state at a single evaluation instant.
///
/// One snapshot is produced per (symbol, timestamp) and flows unchanged
/// through the signal, universe filter, and gate. Components never re-fetch
/// market state mid-evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub price: Decimal,
    /// Volatility index level for the day (e.g. VIX).
    pub vix: f64,
    pub time_of_day: NaiveTime,
    pub timestamp: DateTime<Utc>,
}

/// NBBO snapshot for a single option contract.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OptionQuote {
    pub bid: Decimal,
    pub ask: Decimal,
    pub bid_size: u32,
    pub ask_size: u32,
}

impl OptionQuote {
    #[must_use]
    pub fn mid(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }

    #[must_use]
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn mid_is_average_of_bid_and_ask() {
        let quote = OptionQuote {
            bid: dec!(1.00),
            ask: dec!(1.50),
            bid_size: 10,
            ask_size: 12,
        };
        assert_eq!(quote.mid(), dec!(1.25));
    }

    #[test]
    fn spread_is_ask_minus_bid() {
        let quote = OptionQuote {
            bid: dec!(0.95),
            ask: dec!(1.10),
            bid_size: 5,
            ask_size: 5,
        };
        assert_eq!(quote.spread(), dec!(0.15));
    }
}
