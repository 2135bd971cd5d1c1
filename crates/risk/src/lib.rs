//! Per-day risk ledger.
//!
//! The single source of truth for "can a new trade be opened right now",
//! independent of what the policy gate already allowed. Owns all mutable
//! per-day state: realized/unrealized P&L, trade count, drawdown, open
//! positions, and the sticky halted flag. Once halted, a day stays halted;
//! only `reset_day` re-enters `Active`.

pub mod ledger;
pub mod position;
pub mod state;

pub use ledger::{DaySummary, RiskLedger, RiskRefusal};
pub use position::Position;
pub use state::TradingState;
