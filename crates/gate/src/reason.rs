//! Typed gate outcomes.

use chrono::NaiveTime;
use odte_core::signal::SignalAction;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Why the gate blocked a proposal. A closed set: callers branch on the
/// variant, logs use the `Display` text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateReason {
    /// The action does not open a position; admission governs entries only.
    NotAnEntry { action: SignalAction },
    LowConfidence { confidence: f64, min: f64 },
    SymbolNotAllowed { symbol: String },
    AfterEntryCutoff { time: NaiveTime, cutoff: NaiveTime },
    SpreadTooWide { spread_pct: f64, max_pct: f64 },
    /// Spread consumes essentially the whole premium: the bid is
    /// economically zero and the contract cannot be sold back.
    ZeroBid,
    ExpectedMoveBelowBreakeven {
        expected: Decimal,
        breakeven: Decimal,
    },
}

impl std::fmt::Display for GateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAnEntry { action } => {
                write!(f, "action {action} is not an entry (BUY_CALL or BUY_PUT)")
            }
            Self::LowConfidence { confidence, min } => {
                write!(f, "confidence {confidence:.3} below {min:.3} threshold")
            }
            Self::SymbolNotAllowed { symbol } => {
                write!(f, "symbol {symbol} not in allowed list")
            }
            Self::AfterEntryCutoff { time, cutoff } => {
                write!(f, "time {time} at or past entry cutoff {cutoff}")
            }
            Self::SpreadTooWide {
                spread_pct,
                max_pct,
            } => {
                write!(f, "spread {spread_pct:.1}% of premium exceeds {max_pct:.1}%")
            }
            Self::ZeroBid => {
                write!(f, "bid is effectively zero (ask-only contract), untradeable")
            }
            Self::ExpectedMoveBelowBreakeven {
                expected,
                breakeven,
            } => {
                write!(
                    f,
                    "expected move ${expected:.2} below breakeven move ${breakeven:.2}"
                )
            }
        }
    }
}

/// Outcome of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateResult {
    Allowed,
    Blocked(GateReason),
}

impl GateResult {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// The blocking reason, if any.
    #[must_use]
    pub const fn reason(&self) -> Option<&GateReason> {
        match self {
            Self::Allowed => None,
            Self::Blocked(reason) => Some(reason),
        }
    }
}
