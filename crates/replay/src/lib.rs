//! Replay orchestrator for the 0DTE admission pipeline.
//!
//! Wires the universe filter, policy gate, risk ledger, and fill model over
//! a sequence of timestamped market bars, day by day, in strict
//! chronological order. The same admission path runs live and in replay;
//! only the injected providers differ.

pub mod data_provider;
pub mod engine;
pub mod error;
pub mod records;
pub mod report;
pub mod synthetic;

pub use data_provider::BarStore;
pub use engine::{trading_days, ReplayEngine, ReplayResults};
pub use error::ReplayError;
pub use records::{Decision, HaltEvent, RejectionCause, RejectionRecord, TradeRecord};
pub use report::ReplayReport;
pub use synthetic::SyntheticQuoteSource;
