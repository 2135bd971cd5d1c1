use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use odte_core::config::RiskConfig;
use odte_core::instrument::OptionType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::position::Position;
use crate::state::TradingState;

/// Why the ledger refused a new trade. A closed set, formatted for logs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RiskRefusal {
    /// Trading already halted for the day.
    Halted,
    MaxTradesReached { max: u32 },
    DailyLossExceeded { limit: Decimal, total: Decimal },
}

impl std::fmt::Display for RiskRefusal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Halted => write!(f, "trading halted (daily loss limit exceeded)"),
            Self::MaxTradesReached { max } => {
                write!(f, "max trades per day ({max}) reached")
            }
            Self::DailyLossExceeded { limit, total } => {
                write!(f, "daily loss limit (${limit:.2}) exceeded: ${total:.2}")
            }
        }
    }
}

/// Immutable end-of-day record, archived into the ledger's history when the
/// next day begins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    pub total_pnl: Decimal,
    /// Worst deviation from peak equity, as a fraction (most negative).
    pub max_drawdown: f64,
    pub trades_taken: u32,
    pub halted: bool,
    pub final_equity: Decimal,
}

/// Contracts are assumed to expire at this nominal floor value if still open
/// at end of day.
const EXPIRY_PREMIUM: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// The per-day risk ledger.
///
/// Sole authority for whether a new trade may be opened. All state here is
/// mutated by exactly one caller at a time; the admission invariants (trade
/// count, drawdown, the sticky halt) depend on strict temporal ordering.
#[derive(Debug, Clone)]
pub struct RiskLedger {
    daily_loss_limit: Decimal,
    max_trades_per_day: u32,

    date: Option<NaiveDate>,
    starting_equity: Decimal,
    realized_pnl: Decimal,
    unrealized_pnl: Decimal,
    peak_equity: Decimal,
    max_drawdown: f64,
    trades_taken: u32,
    state: TradingState,
    open_positions: HashMap<String, Position>,

    history: Vec<DaySummary>,
}

impl RiskLedger {
    #[must_use]
    pub fn new(config: &RiskConfig) -> Self {
        Self {
            daily_loss_limit: config.daily_loss_limit,
            max_trades_per_day: config.max_trades_per_day,
            date: None,
            starting_equity: config.starting_equity,
            realized_pnl: Decimal::ZERO,
            unrealized_pnl: Decimal::ZERO,
            peak_equity: config.starting_equity,
            max_drawdown: 0.0,
            trades_taken: 0,
            state: TradingState::Active,
            open_positions: HashMap::new(),
            history: Vec::new(),
        }
    }

    /// Archives the previous day's summary (if any) and resets all mutable
    /// state for `date`. This is the only way to clear the halted flag.
    pub fn reset_day(&mut self, date: NaiveDate, starting_equity: Decimal) {
        if self.date.is_some() {
            let summary = self.build_summary();
            self.history.push(summary);
        }

        self.date = Some(date);
        self.starting_equity = starting_equity;
        self.realized_pnl = Decimal::ZERO;
        self.unrealized_pnl = Decimal::ZERO;
        self.peak_equity = starting_equity;
        self.max_drawdown = 0.0;
        self.trades_taken = 0;
        self.state = TradingState::Active;
        self.open_positions.clear();
    }

    /// Whether a new trade may be opened right now.
    ///
    /// Checks in fixed order: halted, trade count, daily loss. Crossing the
    /// loss limit here is itself the event that trips the breaker, so this
    /// call can flip the ledger to `Halted` as a side effect.
    ///
    /// # Errors
    /// Returns the refusal reason when a new trade is not permitted.
    pub fn can_open_new_trade(&mut self) -> Result<(), RiskRefusal> {
        if self.state.is_halted() {
            return Err(RiskRefusal::Halted);
        }

        if self.trades_taken >= self.max_trades_per_day {
            return Err(RiskRefusal::MaxTradesReached {
                max: self.max_trades_per_day,
            });
        }

        let total = self.realized_pnl + self.unrealized_pnl;
        if total <= self.daily_loss_limit {
            self.state.halt();
            warn!(
                limit = %self.daily_loss_limit,
                total = %total,
                "daily loss limit breached, halting"
            );
            return Err(RiskRefusal::DailyLossExceeded {
                limit: self.daily_loss_limit,
                total,
            });
        }

        Ok(())
    }

    /// Records a new entry. The full cost debits realized P&L immediately:
    /// entries are cash-out events, with no partial accounting.
    #[allow(clippy::too_many_arguments)]
    pub fn record_trade(
        &mut self,
        option_symbol: String,
        underlying: String,
        entry_price: Decimal,
        strike: Decimal,
        option_type: OptionType,
        qty: u32,
        premium: Decimal,
        entry_time: DateTime<Utc>,
    ) {
        let position = Position::new(
            underlying,
            entry_price,
            premium,
            strike,
            option_type,
            qty,
            entry_time,
        );

        self.trades_taken += 1;
        self.realized_pnl -= position.cost;
        self.open_positions.insert(option_symbol, position);
    }

    /// Closes a position at `exit_premium`, crediting the exit proceeds to
    /// realized P&L. Returns the round-trip P&L (proceeds minus entry
    /// cost). Unknown symbols are a no-op returning zero.
    pub fn close_position(&mut self, option_symbol: &str, exit_premium: Decimal) -> Decimal {
        let Some(position) = self.open_positions.remove(option_symbol) else {
            return Decimal::ZERO;
        };

        let proceeds = exit_premium
            * Decimal::from(position.qty)
            * Decimal::from(crate::position::CONTRACT_MULTIPLIER);
        self.realized_pnl += proceeds;

        self.recompute_unrealized();
        proceeds - position.cost
    }

    /// Re-marks one position at `current_premium`, then recomputes the
    /// aggregate unrealized P&L, peak equity, and max intraday drawdown.
    /// Drawdown is a high-water-mark quantity and never resets mid-day.
    pub fn update_unrealized_pnl(&mut self, option_symbol: &str, current_premium: Decimal) {
        if let Some(position) = self.open_positions.get_mut(option_symbol) {
            position.mark = current_premium;
        }

        self.recompute_unrealized();

        let equity = self.equity();
        if equity > self.peak_equity {
            self.peak_equity = equity;
        }

        if self.peak_equity > Decimal::ZERO {
            let drawdown = f64::try_from((equity - self.peak_equity) / self.peak_equity)
                .unwrap_or(0.0);
            if drawdown < self.max_drawdown {
                self.max_drawdown = drawdown;
            }
        }
    }

    /// Independent breach probe, callable mid-timestamp. Trips the halt on
    /// breach, same as `can_open_new_trade`.
    pub fn daily_loss_exceeded(&mut self) -> bool {
        let total = self.realized_pnl + self.unrealized_pnl;
        if total <= self.daily_loss_limit {
            if !self.state.is_halted() {
                warn!(
                    limit = %self.daily_loss_limit,
                    total = %total,
                    "daily loss limit breached, halting"
                );
            }
            self.state.halt();
            return true;
        }
        false
    }

    /// Force-closes every remaining open position at the nominal expiry
    /// value and returns the day's summary. Idempotent: a second call finds
    /// no positions and leaves realized P&L untouched.
    pub fn finalize_day(&mut self) -> DaySummary {
        let symbols: Vec<String> = self.open_positions.keys().cloned().collect();
        for symbol in symbols {
            self.close_position(&symbol, EXPIRY_PREMIUM);
        }
        self.unrealized_pnl = Decimal::ZERO;

        self.build_summary()
    }

    fn build_summary(&self) -> DaySummary {
        let total_pnl = self.realized_pnl + self.unrealized_pnl;
        DaySummary {
            date: self.date.unwrap_or_default(),
            realized_pnl: self.realized_pnl,
            unrealized_pnl: self.unrealized_pnl,
            total_pnl,
            max_drawdown: self.max_drawdown,
            trades_taken: self.trades_taken,
            halted: self.state.is_halted(),
            final_equity: self.starting_equity + total_pnl,
        }
    }

    fn recompute_unrealized(&mut self) {
        self.unrealized_pnl = self
            .open_positions
            .values()
            .map(Position::unrealized_pnl)
            .sum();
    }

    fn equity(&self) -> Decimal {
        self.starting_equity + self.realized_pnl + self.unrealized_pnl
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.state.is_halted()
    }

    #[must_use]
    pub fn daily_loss_limit(&self) -> Decimal {
        self.daily_loss_limit
    }

    #[must_use]
    pub fn realized_pnl(&self) -> Decimal {
        self.realized_pnl
    }

    #[must_use]
    pub fn unrealized_pnl(&self) -> Decimal {
        self.unrealized_pnl
    }

    #[must_use]
    pub fn total_pnl(&self) -> Decimal {
        self.realized_pnl + self.unrealized_pnl
    }

    #[must_use]
    pub fn trades_taken(&self) -> u32 {
        self.trades_taken
    }

    #[must_use]
    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    #[must_use]
    pub const fn open_positions(&self) -> &HashMap<String, Position> {
        &self.open_positions
    }

    #[must_use]
    pub fn history(&self) -> &[DaySummary] {
        &self.history
    }
}
