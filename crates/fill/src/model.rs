use odte_core::config::FillConfig;
use rust_decimal::Decimal;

/// Simulates execution costs assuming the worst reasonable fill.
///
/// Pure: every method is a function of its inputs only, so the same model
/// instance can price live orders and replayed ones interchangeably.
#[derive(Debug, Clone)]
pub struct FillModel {
    fixed_slippage: Decimal,
    spread_penalty: Decimal,
    min_exit_value: Decimal,
}

/// Estimated spread as a fraction of premium when no quote is available.
/// Conservative for same-day expiries, where 15-30% is typical.
const ESTIMATED_SPREAD_FRACTION: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

impl FillModel {
    #[must_use]
    pub fn new(config: &FillConfig) -> Self {
        Self {
            fixed_slippage: config.fixed_slippage,
            spread_penalty: config.spread_penalty,
            min_exit_value: config.min_exit_value,
        }
    }

    /// Fill price for an entry (buy).
    ///
    /// With a real quote the buyer pays the ask plus fixed slippage. Without
    /// one, the spread falls back to [`Self::estimate_spread`] and the fill
    /// is mid plus the larger of fixed slippage and the spread penalty.
    #[must_use]
    pub fn execute_entry(
        &self,
        mid: Decimal,
        premium: Decimal,
        spread_estimate: Option<Decimal>,
        real_bid: Option<Decimal>,
        real_ask: Option<Decimal>,
    ) -> Decimal {
        if let (Some(_), Some(ask)) = (real_bid, real_ask) {
            return ask + self.fixed_slippage;
        }

        let spread = spread_estimate.unwrap_or_else(|| self.estimate_spread(premium));
        mid + self.fixed_slippage.max(self.spread_penalty * spread)
    }

    /// Fill price for an exit (sell): the mirror of entry, floored so a
    /// contract never sells for a non-positive value.
    #[must_use]
    pub fn execute_exit(
        &self,
        mid: Decimal,
        premium: Decimal,
        spread_estimate: Option<Decimal>,
        real_bid: Option<Decimal>,
        real_ask: Option<Decimal>,
    ) -> Decimal {
        if let (Some(bid), Some(_)) = (real_bid, real_ask) {
            return (bid - self.fixed_slippage).max(self.min_exit_value);
        }

        let spread = spread_estimate.unwrap_or_else(|| self.estimate_spread(premium));
        let fill = mid - self.fixed_slippage.max(self.spread_penalty * spread);
        fill.max(self.min_exit_value)
    }

    /// Conservative spread estimate when no quote is available: a fixed
    /// fraction of premium.
    #[must_use]
    pub fn estimate_spread(&self, premium: Decimal) -> Decimal {
        premium * ESTIMATED_SPREAD_FRACTION
    }
}

impl Default for FillModel {
    fn default() -> Self {
        Self::new(&FillConfig::default())
    }
}
