//! Output types for the external decision signal.
//!
//! The signal itself is a black box consumed through
//! [`crate::traits::DecisionSignal`]; it is frozen during a replay run and
//! never updated from replay outcomes.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::instrument::OptionType;

/// Action emitted by the decision signal for one evaluation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalAction {
    Hold,
    BuyCall,
    BuyPut,
    /// Trim 50% of an open position.
    Trim50,
    /// Trim 70% of an open position.
    Trim70,
    Exit,
}

impl SignalAction {
    /// True only for the actions that open a new position. Admission
    /// control governs entries; everything else passes through untouched.
    #[must_use]
    pub const fn is_entry(self) -> bool {
        matches!(self, Self::BuyCall | Self::BuyPut)
    }

    /// The contract right an entry action maps to, if any.
    #[must_use]
    pub const fn option_type(self) -> Option<OptionType> {
        match self {
            Self::BuyCall => Some(OptionType::Call),
            Self::BuyPut => Some(OptionType::Put),
            _ => None,
        }
    }
}

impl std::fmt::Display for SignalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hold => write!(f, "HOLD"),
            Self::BuyCall => write!(f, "BUY_CALL"),
            Self::BuyPut => write!(f, "BUY_PUT"),
            Self::Trim50 => write!(f, "TRIM_50"),
            Self::Trim70 => write!(f, "TRIM_70"),
            Self::Exit => write!(f, "EXIT"),
        }
    }
}

/// Raw output of one signal inference: an action plus a confidence score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalOutput {
    pub action: SignalAction,
    /// Confidence in [0.0, 1.0].
    pub confidence: f64,
}

impl SignalOutput {
    /// Creates a new `SignalOutput` with validation.
    ///
    /// # Errors
    /// Returns an error if confidence is outside [0.0, 1.0].
    pub fn new(action: SignalAction, confidence: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            anyhow::bail!("confidence must be in [0.0, 1.0], got {confidence}");
        }
        Ok(Self { action, confidence })
    }

    /// A do-nothing signal with zero confidence.
    #[must_use]
    pub const fn hold() -> Self {
        Self {
            action: SignalAction::Hold,
            confidence: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_buy_actions_are_entries() {
        assert!(SignalAction::BuyCall.is_entry());
        assert!(SignalAction::BuyPut.is_entry());
        assert!(!SignalAction::Hold.is_entry());
        assert!(!SignalAction::Trim50.is_entry());
        assert!(!SignalAction::Trim70.is_entry());
        assert!(!SignalAction::Exit.is_entry());
    }

    #[test]
    fn entry_actions_map_to_option_type() {
        assert_eq!(SignalAction::BuyCall.option_type(), Some(OptionType::Call));
        assert_eq!(SignalAction::BuyPut.option_type(), Some(OptionType::Put));
        assert_eq!(SignalAction::Exit.option_type(), None);
    }

    #[test]
    fn confidence_outside_unit_interval_rejected() {
        assert!(SignalOutput::new(SignalAction::BuyCall, 1.5).is_err());
        assert!(SignalOutput::new(SignalAction::BuyCall, -0.1).is_err());
        assert!(SignalOutput::new(SignalAction::BuyCall, 0.65).is_ok());
    }

    #[test]
    fn hold_signal_has_zero_confidence() {
        let signal = SignalOutput::hold();
        assert_eq!(signal.action, SignalAction::Hold);
        assert!((signal.confidence - 0.0).abs() < f64::EPSILON);
    }
}
