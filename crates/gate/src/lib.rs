//! Hard-veto policy gate.
//!
//! The non-negotiable trading rules as an ordered, short-circuiting chain of
//! checks. The first failing check is the recorded reason; nothing is scored
//! or weighted, and no override path exists. Deliberately frozen independent
//! of the decision signal's behavior so it stays auditable.

pub mod gate;
pub mod reason;

pub use gate::{PolicyGate, TradeProposal};
pub use reason::{GateReason, GateResult};
