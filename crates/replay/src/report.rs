//! Text reporting over replay results.
//!
//! Totals, per-day breakdown, rejection analysis, and the discipline
//! criteria a run is judged against. No plotting; output is a plain string.

use std::collections::BTreeMap;

use crate::engine::ReplayResults;

/// Discipline criteria evaluated over a run. The point of the admission
/// pipeline is saying no: a run that never halts, stays under the trade
/// cap, and sits out bad days is behaving.
#[derive(Debug, Clone)]
pub struct Discipline {
    /// No day breached the hard daily loss limit.
    pub no_halted_days: bool,
    /// Average trades per day stayed within the per-day cap.
    pub avg_trades_within_cap: bool,
    /// Share of days with zero trades, in [0, 1].
    pub zero_trade_day_share: f64,
    pub avg_trades_per_day: f64,
}

impl Discipline {
    #[must_use]
    pub fn evaluate(results: &ReplayResults, max_trades_per_day: u32) -> Self {
        let days = results.summaries.len().max(1);
        #[allow(clippy::cast_precision_loss)]
        let avg_trades_per_day = results.total_trades() as f64 / days as f64;
        #[allow(clippy::cast_precision_loss)]
        let zero_trade_day_share = results.zero_trade_days() as f64 / days as f64;

        Self {
            no_halted_days: results.days_halted() == 0,
            avg_trades_within_cap: avg_trades_per_day <= f64::from(max_trades_per_day),
            zero_trade_day_share,
            avg_trades_per_day,
        }
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.no_halted_days && self.avg_trades_within_cap
    }
}

pub struct ReplayReport;

impl ReplayReport {
    /// Renders the full run report as text.
    #[must_use]
    pub fn format(results: &ReplayResults, max_trades_per_day: u32) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                    REPLAY RESULTS                             \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str(&format!("Period:               {} to {}\n", results.start, results.end));
        output.push_str(&format!("Trading Days:         {}\n", results.trading_days));
        output.push_str(&format!("Total Trades:         {}\n", results.total_trades()));
        output.push_str(&format!("Total Rejections:     {}\n", results.rejections.len()));
        output.push_str(&format!("Total P&L:            ${:.2}\n", results.total_pnl()));
        output.push('\n');

        output.push_str("Daily Breakdown\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        for summary in &results.summaries {
            output.push_str(&format!(
                "{}: trades={}, pnl=${:.2}, drawdown={:.2}%, halted={}\n",
                summary.date,
                summary.trades_taken,
                summary.total_pnl,
                summary.max_drawdown * 100.0,
                summary.halted
            ));
        }
        output.push('\n');

        if !results.trades.is_empty() {
            output.push_str("Trades by Symbol\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for (symbol, count) in count_by(results.trades.iter().map(|t| t.symbol.clone())) {
                output.push_str(&format!("{symbol}: {count}\n"));
            }
            output.push('\n');

            output.push_str("Trades by Action\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for (action, count) in count_by(results.trades.iter().map(|t| t.action.to_string())) {
                output.push_str(&format!("{action}: {count}\n"));
            }
            output.push('\n');
        }

        if !results.rejections.is_empty() {
            output.push_str("Rejections by Reason\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for (cause, count) in count_by(results.rejections.iter().map(|r| r.cause.to_string()))
            {
                output.push_str(&format!("{cause}: {count}\n"));
            }
            output.push('\n');
        }

        let discipline = Discipline::evaluate(results, max_trades_per_day);
        output.push_str("Discipline Criteria\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "{} daily loss limit: {} day(s) halted\n",
            pass_mark(discipline.no_halted_days),
            results.days_halted()
        ));
        output.push_str(&format!(
            "{} trade cap: {:.2} avg trades/day (cap {})\n",
            pass_mark(discipline.avg_trades_within_cap),
            discipline.avg_trades_per_day,
            max_trades_per_day
        ));
        output.push_str(&format!(
            "zero-trade days: {:.1}%\n",
            discipline.zero_trade_day_share * 100.0
        ));
        output.push_str(&format!(
            "\nOverall: {}\n",
            if discipline.passed() { "PASSED" } else { "FAILED" }
        ));

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");

        if results.total_trades() == 0 {
            output.push_str("\nNo trades were admitted during this replay.\n");
            output.push_str("Zero qualifying setups is a designed outcome, not a fault.\n");
        }

        output
    }
}

fn count_by(items: impl Iterator<Item = String>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

const fn pass_mark(ok: bool) -> &'static str {
    if ok {
        "PASS"
    } else {
        "FAIL"
    }
}
