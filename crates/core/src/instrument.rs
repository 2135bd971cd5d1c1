//! Option contract identities and the tradeable-instrument value type.

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::events::OptionQuote;

/// Contract right: call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Single-character OCC symbol code.
    #[must_use]
    pub const fn occ_char(self) -> char {
        match self {
            Self::Call => 'C',
            Self::Put => 'P',
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// Builds an OCC-style option symbol: underlying, two-digit expiry date,
/// right character, strike in thousandths zero-padded to eight digits
/// (e.g. `SPY251216C00590000`).
#[must_use]
pub fn occ_symbol(
    underlying: &str,
    expiry: NaiveDate,
    option_type: OptionType,
    strike: Decimal,
) -> String {
    let strike_milli = (strike * Decimal::ONE_THOUSAND).trunc().to_i64().unwrap_or(0);
    format!(
        "{underlying}{}{}{strike_milli:08}",
        expiry.format("%y%m%d"),
        option_type.occ_char()
    )
}

/// A synthetically enumerated contract, before any quote is attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateContract {
    pub symbol: String,
    pub strike: Decimal,
    pub option_type: OptionType,
}

impl CandidateContract {
    #[must_use]
    pub fn new(
        underlying: &str,
        expiry: NaiveDate,
        option_type: OptionType,
        strike: Decimal,
    ) -> Self {
        Self {
            symbol: occ_symbol(underlying, expiry, option_type, strike),
            strike,
            option_type,
        }
    }
}

/// A contract that survived liquidity filtering, carrying the quote that
/// admitted it. Quote data is never separated from the symbol it describes;
/// strike and right are parsed once here and never re-derived downstream.
///
/// Ephemeral: recomputed every evaluation, never persisted across timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeableInstrument {
    pub symbol: String,
    pub strike: Decimal,
    pub option_type: OptionType,
    pub bid: Decimal,
    pub ask: Decimal,
    pub mid: Decimal,
    pub spread: Decimal,
    /// Spread as a percentage of mid; 100.0 when mid is zero.
    pub spread_pct: f64,
    pub bid_size: u32,
    pub ask_size: u32,
}

impl TradeableInstrument {
    #[must_use]
    pub fn from_quote(contract: &CandidateContract, quote: &OptionQuote) -> Self {
        let mid = quote.mid();
        let spread = quote.spread();
        let spread_pct = if mid > Decimal::ZERO {
            (spread / mid * Decimal::ONE_HUNDRED)
                .to_f64()
                .unwrap_or(100.0)
        } else {
            100.0
        };

        Self {
            symbol: contract.symbol.clone(),
            strike: contract.strike,
            option_type: contract.option_type,
            bid: quote.bid,
            ask: quote.ask,
            mid,
            spread,
            spread_pct,
            bid_size: quote.bid_size,
            ask_size: quote.ask_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn occ_symbol_layout_matches_convention() {
        let expiry = NaiveDate::from_ymd_opt(2025, 12, 16).unwrap();
        let symbol = occ_symbol("SPY", expiry, OptionType::Call, dec!(590));
        assert_eq!(symbol, "SPY251216C00590000");
    }

    #[test]
    fn occ_symbol_encodes_fractional_strikes() {
        let expiry = NaiveDate::from_ymd_opt(2025, 12, 16).unwrap();
        let symbol = occ_symbol("QQQ", expiry, OptionType::Put, dec!(512.5));
        assert_eq!(symbol, "QQQ251216P00512500");
    }

    #[test]
    fn instrument_carries_quote_and_derived_fields() {
        let expiry = NaiveDate::from_ymd_opt(2025, 12, 16).unwrap();
        let contract = CandidateContract::new("SPY", expiry, OptionType::Call, dec!(590));
        let quote = OptionQuote {
            bid: dec!(1.00),
            ask: dec!(1.20),
            bid_size: 25,
            ask_size: 40,
        };

        let inst = TradeableInstrument::from_quote(&contract, &quote);
        assert_eq!(inst.symbol, "SPY251216C00590000");
        assert_eq!(inst.strike, dec!(590));
        assert_eq!(inst.mid, dec!(1.10));
        assert_eq!(inst.spread, dec!(0.20));
        assert!((inst.spread_pct - 18.18).abs() < 0.01);
    }

    #[test]
    fn zero_mid_reports_full_spread_pct() {
        let expiry = NaiveDate::from_ymd_opt(2025, 12, 16).unwrap();
        let contract = CandidateContract::new("SPY", expiry, OptionType::Put, dec!(580));
        let quote = OptionQuote {
            bid: dec!(0),
            ask: dec!(0),
            bid_size: 0,
            ask_size: 0,
        };

        let inst = TradeableInstrument::from_quote(&contract, &quote);
        assert!((inst.spread_pct - 100.0).abs() < f64::EPSILON);
    }
}
