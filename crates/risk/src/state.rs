use serde::{Deserialize, Serialize};

/// Per-day trading state.
///
/// Two states, one transition: `Active → Halted` via [`TradingState::halt`].
/// There is no same-day recovery; a new day's `reset_day` constructs a fresh
/// `Active` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradingState {
    Active,
    Halted,
}

impl TradingState {
    /// The single transition. Idempotent: halting a halted day stays halted.
    pub fn halt(&mut self) {
        *self = Self::Halted;
    }

    #[must_use]
    pub const fn is_halted(self) -> bool {
        matches!(self, Self::Halted)
    }
}
