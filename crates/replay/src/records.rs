//! Produced artifacts of a replay run: decisions, trades, rejections.

use chrono::{DateTime, NaiveDate, Utc};
use odte_core::instrument::TradeableInstrument;
use odte_core::signal::SignalAction;
use odte_gate::reason::{GateReason, GateResult};
use odte_risk::ledger::RiskRefusal;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why a proposed trade did not execute. A closed set layered over the gate
/// and ledger reason enums; never a free-form string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectionCause {
    /// The universe filter left nothing of the requested type to trade.
    NoTradeableInstruments,
    Gate(GateReason),
    Risk(RiskRefusal),
}

impl std::fmt::Display for RejectionCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTradeableInstruments => write!(f, "no tradeable instruments"),
            Self::Gate(reason) => write!(f, "gate: {reason}"),
            Self::Risk(refusal) => write!(f, "risk ledger: {refusal}"),
        }
    }
}

/// One full evaluation cycle for a (symbol, timestamp) pair. Logged by the
/// orchestrator; never mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub price: Decimal,
    pub vix: f64,
    pub action: SignalAction,
    pub confidence: f64,
    pub instrument: Option<TradeableInstrument>,
    pub expected_move: Decimal,
    pub breakeven_move: Decimal,
    pub gate: GateResult,
    /// Present only when the trade was admitted and filled.
    pub fill_price: Option<Decimal>,
}

/// An executed trade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub option_symbol: String,
    pub action: SignalAction,
    pub strike: Decimal,
    /// Underlying price at entry.
    pub entry_price: Decimal,
    /// Fill price per contract actually paid.
    pub entry_premium: Decimal,
    pub qty: u32,
    pub confidence: f64,
    pub expected_move: Decimal,
    pub breakeven_move: Decimal,
    pub vix: f64,
}

/// A non-trade, with the specific reason it was turned away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionRecord {
    pub date: NaiveDate,
    pub timestamp: DateTime<Utc>,
    pub symbol: String,
    pub action: SignalAction,
    pub confidence: f64,
    pub cause: RejectionCause,
}

/// A halt/skip event: the ledger refused all admissions at this timestamp.
/// Logged once per transition, not once per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HaltEvent {
    pub timestamp: DateTime<Utc>,
    pub refusal: RiskRefusal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn rejection_causes_format_for_logging() {
        assert_eq!(
            RejectionCause::NoTradeableInstruments.to_string(),
            "no tradeable instruments"
        );
        assert_eq!(
            RejectionCause::Risk(RiskRefusal::Halted).to_string(),
            "risk ledger: trading halted (daily loss limit exceeded)"
        );
        assert_eq!(
            RejectionCause::Gate(GateReason::ZeroBid).to_string(),
            "gate: bid is effectively zero (ask-only contract), untradeable"
        );
    }

    #[test]
    fn rejection_record_serialization_roundtrip() {
        let record = RejectionRecord {
            date: NaiveDate::from_ymd_opt(2025, 12, 16).unwrap(),
            timestamp: Utc::now(),
            symbol: "SPY".to_string(),
            action: SignalAction::BuyCall,
            confidence: 0.72,
            cause: RejectionCause::Gate(GateReason::ExpectedMoveBelowBreakeven {
                expected: dec!(1.20),
                breakeven: dec!(1.50),
            }),
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: RejectionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back.cause, record.cause);
        assert_eq!(back.symbol, record.symbol);
    }
}
