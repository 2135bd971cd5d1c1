//! The replay loop: days → timestamps → symbols.
//!
//! # Design Principles
//!
//! 1. **Deterministic ordering**: days, timestamps, and symbols are walked
//!    in a fixed sequence against a single ledger; nothing runs
//!    concurrently, so the kill switches fire at reproducible points.
//!
//! 2. **Frozen signal**: the decision signal is queried, never trained or
//!    tuned; replaying the same inputs yields the same decisions.
//!
//! 3. **Skips over failures**: a bad tick is logged and dropped. An empty
//!    instrument universe is not an error, it is the designed rejection
//!    path: better zero trades than wrong trades.

use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

use odte_core::config::EngineConfig;
use odte_core::instrument::{CandidateContract, OptionType};
use odte_core::moves;
use odte_core::traits::{DecisionSignal, MarketDataProvider, QuoteSource};
use odte_fill::FillModel;
use odte_gate::gate::{PolicyGate, TradeProposal};
use odte_gate::reason::GateResult;
use odte_risk::ledger::{DaySummary, RiskLedger, RiskRefusal};
use odte_universe::UniverseFilter;

use crate::error::ReplayError;
use crate::records::{Decision, HaltEvent, RejectionCause, RejectionRecord, TradeRecord};

/// Weekdays between `start` and `end` inclusive. Holiday calendars are the
/// data provider's concern: a holiday simply has no bars and every tick
/// skips.
#[must_use]
pub fn trading_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(current);
        }
        let Some(next) = current.succ_opt() else {
            break;
        };
        current = next;
    }
    days
}

/// Everything a replay run produces.
#[derive(Debug, Serialize)]
pub struct ReplayResults {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub trading_days: usize,
    pub summaries: Vec<DaySummary>,
    pub trades: Vec<TradeRecord>,
    pub rejections: Vec<RejectionRecord>,
    pub decisions: Vec<Decision>,
    pub halts: Vec<HaltEvent>,
}

impl ReplayResults {
    #[must_use]
    pub fn total_pnl(&self) -> Decimal {
        self.summaries.iter().map(|s| s.total_pnl).sum()
    }

    #[must_use]
    pub fn total_trades(&self) -> usize {
        self.trades.len()
    }

    #[must_use]
    pub fn days_halted(&self) -> usize {
        self.summaries.iter().filter(|s| s.halted).count()
    }

    #[must_use]
    pub fn zero_trade_days(&self) -> usize {
        self.summaries.iter().filter(|s| s.trades_taken == 0).count()
    }
}

/// Replays the admission pipeline over historical days.
///
/// Generic over the injected market data provider and decision signal; the
/// quote source sits behind a trait object because the universe filter
/// shares it.
pub struct ReplayEngine<P, S>
where
    P: MarketDataProvider,
    S: DecisionSignal,
{
    provider: P,
    signal: S,
    quotes: Arc<dyn QuoteSource>,
    universe: UniverseFilter,
    gate: PolicyGate,
    fill: FillModel,
    ledger: RiskLedger,
    config: EngineConfig,

    decisions: Vec<Decision>,
    trades: Vec<TradeRecord>,
    rejections: Vec<RejectionRecord>,
    halts: Vec<HaltEvent>,
    summaries: Vec<DaySummary>,
}

impl<P, S> ReplayEngine<P, S>
where
    P: MarketDataProvider,
    S: DecisionSignal,
{
    #[must_use]
    pub fn new(config: EngineConfig, provider: P, signal: S, quotes: Arc<dyn QuoteSource>) -> Self {
        let universe = UniverseFilter::new(Arc::clone(&quotes), config.universe.clone());
        let gate = PolicyGate::new(config.gate.clone());
        let fill = FillModel::new(&config.fill);
        let ledger = RiskLedger::new(&config.risk);

        Self {
            provider,
            signal,
            quotes,
            universe,
            gate,
            fill,
            ledger,
            config,
            decisions: Vec::new(),
            trades: Vec::new(),
            rejections: Vec::new(),
            halts: Vec::new(),
            summaries: Vec::new(),
        }
    }

    /// Replays every trading day between `start` and `end` inclusive.
    ///
    /// # Errors
    /// Fails only when the trading-day calendar is empty; everything else
    /// is absorbed as per-tick skips.
    pub async fn run(mut self, start: NaiveDate, end: NaiveDate) -> Result<ReplayResults> {
        let days = trading_days(start, end);
        if days.is_empty() {
            return Err(ReplayError::EmptyCalendar { start, end }.into());
        }

        info!(
            %start,
            %end,
            days = days.len(),
            signal = self.signal.name(),
            "starting replay"
        );

        for day in &days {
            self.replay_day(*day).await;
        }

        Ok(ReplayResults {
            start,
            end,
            trading_days: days.len(),
            summaries: self.summaries,
            trades: self.trades,
            rejections: self.rejections,
            decisions: self.decisions,
            halts: self.halts,
        })
    }

    /// One trading day: reset the ledger, walk the session clock, finalize.
    /// `finalize_day` always runs so open positions are never left
    /// unaccounted for.
    async fn replay_day(&mut self, day: NaiveDate) {
        info!(%day, "replaying trading day");
        self.ledger
            .reset_day(day, self.config.risk.starting_equity);

        let step = Duration::minutes(i64::from(self.config.session.step_minutes.max(1)));
        let mut refusal_logged = false;
        let mut time = self.config.session.open;

        while time < self.config.session.close {
            let timestamp = day.and_time(time).and_utc();

            match self.ledger.can_open_new_trade() {
                Err(refusal) => {
                    // Admissions are shut for the rest of the day; log the
                    // transition once and keep ticking.
                    if !refusal_logged {
                        info!(%timestamp, %refusal, "admissions refused");
                        self.halts.push(HaltEvent { timestamp, refusal });
                        refusal_logged = true;
                    }
                }
                Ok(()) => {
                    let symbols = self.config.session.symbols.clone();
                    for symbol in &symbols {
                        if let Err(e) = self.process_symbol(symbol, day, timestamp).await {
                            warn!(
                                symbol,
                                %timestamp,
                                error = %e,
                                "evaluation failed, skipping tick"
                            );
                        }
                    }

                    self.mark_positions(timestamp).await;

                    // Mid-day breach probe: halts further admissions but
                    // never aborts the day.
                    if self.ledger.daily_loss_exceeded() && !refusal_logged {
                        let refusal = RiskRefusal::DailyLossExceeded {
                            limit: self.ledger.daily_loss_limit(),
                            total: self.ledger.total_pnl(),
                        };
                        info!(%timestamp, %refusal, "admissions refused");
                        self.halts.push(HaltEvent { timestamp, refusal });
                        refusal_logged = true;
                    }
                }
            }

            time += step;
        }

        let summary = self.ledger.finalize_day();
        info!(
            %day,
            trades = summary.trades_taken,
            pnl = %summary.total_pnl,
            halted = summary.halted,
            "day complete"
        );
        self.summaries.push(summary);
    }

    /// One (symbol, timestamp) evaluation: snapshot → signal → universe →
    /// gate → ledger → fill → ledger mutation. Any `Err` out of here is
    /// caught by the caller and treated as "no action this tick".
    async fn process_symbol(
        &mut self,
        symbol: &str,
        day: NaiveDate,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        let Some(snapshot) = self.provider.snapshot(symbol, timestamp).await? else {
            return Ok(());
        };

        let signal = self.signal.evaluate(&snapshot).await?;
        let Some(option_type) = signal.action.option_type() else {
            return Ok(());
        };

        let expected_move = moves::expected_move(snapshot.price, snapshot.vix);

        let tradeable = self
            .universe
            .tradeable(symbol, &snapshot, day, option_type)
            .await?;
        let Some(best) = self
            .universe
            .select_best(&tradeable, snapshot.price, option_type)
            .cloned()
        else {
            debug!(symbol, %timestamp, "no tradeable instruments");
            self.rejections.push(RejectionRecord {
                date: day,
                timestamp,
                symbol: symbol.to_string(),
                action: signal.action,
                confidence: signal.confidence,
                cause: RejectionCause::NoTradeableInstruments,
            });
            return Ok(());
        };

        let premium = best.mid;
        let breakeven_move =
            moves::breakeven_move(snapshot.price, best.strike, premium, option_type);

        let proposal = TradeProposal {
            action: signal.action,
            confidence: signal.confidence,
            symbol: symbol.to_string(),
            spot: snapshot.price,
            strike: best.strike,
            option_type,
            premium,
            spread: Some(best.spread),
            expected_move: Some(expected_move),
            breakeven_move: Some(breakeven_move),
            time_of_day: snapshot.time_of_day,
            vix: Some(snapshot.vix),
        };

        let gate_result = self.gate.evaluate(&proposal);

        let mut decision = Decision {
            timestamp,
            symbol: symbol.to_string(),
            price: snapshot.price,
            vix: snapshot.vix,
            action: signal.action,
            confidence: signal.confidence,
            instrument: Some(best.clone()),
            expected_move,
            breakeven_move,
            gate: gate_result.clone(),
            fill_price: None,
        };

        if let GateResult::Blocked(reason) = gate_result {
            debug!(symbol, %timestamp, reason = %reason, "blocked by gate");
            self.rejections.push(RejectionRecord {
                date: day,
                timestamp,
                symbol: symbol.to_string(),
                action: signal.action,
                confidence: signal.confidence,
                cause: RejectionCause::Gate(reason),
            });
            self.decisions.push(decision);
            return Ok(());
        }

        // Risk state may have moved since the timestamp-level check (an
        // earlier symbol this tick may have traded or breached a limit).
        if let Err(refusal) = self.ledger.can_open_new_trade() {
            debug!(symbol, %timestamp, refusal = %refusal, "refused by risk ledger");
            self.rejections.push(RejectionRecord {
                date: day,
                timestamp,
                symbol: symbol.to_string(),
                action: signal.action,
                confidence: signal.confidence,
                cause: RejectionCause::Risk(refusal),
            });
            self.decisions.push(decision);
            return Ok(());
        }

        let qty = self.config.session.contracts_per_trade;
        let fill = self.fill.execute_entry(
            best.mid,
            premium,
            Some(best.spread),
            Some(best.bid),
            Some(best.ask),
        );

        self.ledger.record_trade(
            best.symbol.clone(),
            symbol.to_string(),
            snapshot.price,
            best.strike,
            option_type,
            qty,
            fill,
            timestamp,
        );

        info!(
            symbol,
            option = best.symbol,
            strike = %best.strike,
            premium = %fill,
            confidence = signal.confidence,
            tradeable = tradeable.len(),
            "trade executed"
        );

        self.trades.push(TradeRecord {
            date: day,
            timestamp,
            symbol: symbol.to_string(),
            option_symbol: best.symbol.clone(),
            action: signal.action,
            strike: best.strike,
            entry_price: snapshot.price,
            entry_premium: fill,
            qty,
            confidence: signal.confidence,
            expected_move,
            breakeven_move,
            vix: snapshot.vix,
        });

        decision.fill_price = Some(fill);
        self.decisions.push(decision);

        Ok(())
    }

    /// Re-marks every open position at the current quote mid. A missing
    /// snapshot or quote keeps the previous mark; marking never fails the
    /// tick.
    async fn mark_positions(&mut self, timestamp: DateTime<Utc>) {
        let open: Vec<(String, String, Decimal, OptionType)> = self
            .ledger
            .open_positions()
            .iter()
            .map(|(symbol, pos)| {
                (
                    symbol.clone(),
                    pos.underlying.clone(),
                    pos.strike,
                    pos.option_type,
                )
            })
            .collect();

        for (option_symbol, underlying, strike, option_type) in open {
            let snapshot = match self.provider.snapshot(&underlying, timestamp).await {
                Ok(Some(snapshot)) => snapshot,
                Ok(None) => continue,
                Err(e) => {
                    warn!(symbol = underlying, error = %e, "mark snapshot failed");
                    continue;
                }
            };

            let contract = CandidateContract {
                symbol: option_symbol.clone(),
                strike,
                option_type,
            };
            match self.quotes.option_quote(&contract, &snapshot).await {
                Ok(Some(quote)) => {
                    self.ledger.update_unrealized_pnl(&option_symbol, quote.mid());
                }
                Ok(None) => {}
                Err(e) => warn!(symbol = option_symbol, error = %e, "mark quote failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn trading_days_skip_weekends() {
        // 2025-12-12 is a Friday; the 13th/14th are a weekend.
        let days = trading_days(date(2025, 12, 12), date(2025, 12, 16));
        assert_eq!(
            days,
            vec![date(2025, 12, 12), date(2025, 12, 15), date(2025, 12, 16)]
        );
    }

    #[test]
    fn trading_days_empty_when_range_is_a_weekend() {
        let days = trading_days(date(2025, 12, 13), date(2025, 12, 14));
        assert!(days.is_empty());
    }

    #[test]
    fn trading_days_empty_when_end_precedes_start() {
        let days = trading_days(date(2025, 12, 16), date(2025, 12, 12));
        assert!(days.is_empty());
    }
}
