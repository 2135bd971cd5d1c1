use chrono::{DateTime, Utc};
use odte_core::instrument::OptionType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Dollars of underlying notional per contract.
pub const CONTRACT_MULTIPLIER: u32 = 100;

/// An open position, owned exclusively by the ledger that recorded it.
/// Removed on close or on end-of-day liquidation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub underlying: String,
    /// Underlying price at entry.
    pub entry_price: Decimal,
    /// Premium paid per contract.
    pub entry_premium: Decimal,
    pub strike: Decimal,
    pub option_type: OptionType,
    pub qty: u32,
    pub entry_time: DateTime<Utc>,
    /// Total cost: qty × premium × contract multiplier.
    pub cost: Decimal,
    /// Last observed premium, used for unrealized P&L. Starts at entry.
    pub mark: Decimal,
}

impl Position {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        underlying: String,
        entry_price: Decimal,
        entry_premium: Decimal,
        strike: Decimal,
        option_type: OptionType,
        qty: u32,
        entry_time: DateTime<Utc>,
    ) -> Self {
        let cost = entry_premium * Decimal::from(qty) * Decimal::from(CONTRACT_MULTIPLIER);
        Self {
            underlying,
            entry_price,
            entry_premium,
            strike,
            option_type,
            qty,
            entry_time,
            cost,
            mark: entry_premium,
        }
    }

    /// Unrealized P&L at the current mark.
    #[must_use]
    pub fn unrealized_pnl(&self) -> Decimal {
        (self.mark - self.entry_premium)
            * Decimal::from(self.qty)
            * Decimal::from(CONTRACT_MULTIPLIER)
    }
}
