use chrono::NaiveTime;
use odte_core::config::GateConfig;
use odte_core::instrument::OptionType;
use odte_core::moves;
use odte_core::signal::SignalAction;
use rust_decimal::Decimal;

use crate::reason::{GateReason, GateResult};

/// Spread-to-premium ratio at which the bid is treated as economically zero,
/// independent of the configured spread ceiling.
const ZERO_BID_SPREAD_FRACTION: Decimal = Decimal::from_parts(95, 0, 0, false, 2);

/// Everything the gate needs to judge one proposed entry. Assembled per
/// evaluation cycle; optional fields are derived when absent (see check 6).
#[derive(Debug, Clone)]
pub struct TradeProposal {
    pub action: SignalAction,
    pub confidence: f64,
    pub symbol: String,
    pub spot: Decimal,
    pub strike: Decimal,
    pub option_type: OptionType,
    pub premium: Decimal,
    /// Known bid/ask spread, from a real quote when available.
    pub spread: Option<Decimal>,
    pub expected_move: Option<Decimal>,
    pub breakeven_move: Option<Decimal>,
    pub time_of_day: NaiveTime,
    pub vix: Option<f64>,
}

/// Ordered hard vetoes over a [`TradeProposal`].
///
/// Pure function of its inputs: no hidden state, no learning, no overrides.
/// The check order is fixed; the first failure is the reported reason and
/// later checks are not evaluated.
#[derive(Debug, Clone)]
pub struct PolicyGate {
    config: GateConfig,
}

impl PolicyGate {
    #[must_use]
    pub fn new(config: GateConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Evaluates all applicable checks in order, returning `Allowed` only
    /// if every one passes.
    #[must_use]
    pub fn evaluate(&self, proposal: &TradeProposal) -> GateResult {
        // 1. Only entry actions are admitted.
        if !proposal.action.is_entry() {
            return GateResult::Blocked(GateReason::NotAnEntry {
                action: proposal.action,
            });
        }

        // 2. Confidence threshold.
        if proposal.confidence < self.config.min_confidence {
            return GateResult::Blocked(GateReason::LowConfidence {
                confidence: proposal.confidence,
                min: self.config.min_confidence,
            });
        }

        // 3. Symbol allow-list.
        if !self
            .config
            .allowed_symbols
            .iter()
            .any(|s| s == &proposal.symbol)
        {
            return GateResult::Blocked(GateReason::SymbolNotAllowed {
                symbol: proposal.symbol.clone(),
            });
        }

        // 4. No new entries at or after the cutoff.
        if proposal.time_of_day >= self.config.entry_cutoff {
            return GateResult::Blocked(GateReason::AfterEntryCutoff {
                time: proposal.time_of_day,
                cutoff: self.config.entry_cutoff,
            });
        }

        // 5. Spread checks, when a spread is known.
        if let Some(spread) = proposal.spread {
            if proposal.premium > Decimal::ZERO {
                let spread_pct = spread_pct_of_premium(spread, proposal.premium);
                if spread_pct > self.config.max_spread_pct {
                    return GateResult::Blocked(GateReason::SpreadTooWide {
                        spread_pct,
                        max_pct: self.config.max_spread_pct,
                    });
                }
            }

            if spread >= proposal.premium * ZERO_BID_SPREAD_FRACTION {
                return GateResult::Blocked(GateReason::ZeroBid);
            }
        }

        // 6. Expected move must cover the breakeven move. Either side is
        //    derived when the caller could not supply it.
        let expected = proposal.expected_move.or_else(|| {
            proposal.vix.and_then(|vix| {
                (proposal.spot > Decimal::ZERO).then(|| moves::expected_move(proposal.spot, vix))
            })
        });
        let breakeven = proposal.breakeven_move.or_else(|| {
            (proposal.spot > Decimal::ZERO
                && proposal.strike > Decimal::ZERO
                && proposal.premium > Decimal::ZERO)
                .then(|| {
                    moves::breakeven_move(
                        proposal.spot,
                        proposal.strike,
                        proposal.premium,
                        proposal.option_type,
                    )
                })
        });

        if let (Some(expected), Some(breakeven)) = (expected, breakeven) {
            if expected < breakeven.abs() {
                return GateResult::Blocked(GateReason::ExpectedMoveBelowBreakeven {
                    expected,
                    breakeven: breakeven.abs(),
                });
            }
        }

        GateResult::Allowed
    }
}

fn spread_pct_of_premium(spread: Decimal, premium: Decimal) -> f64 {
    use rust_decimal::prelude::ToPrimitive;
    (spread / premium * Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(100.0)
}
