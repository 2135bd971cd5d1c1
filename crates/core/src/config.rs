//! Engine configuration.
//!
//! Every threshold in the admission pipeline lives here as a fixed constant
//! with a serde override path; nothing is tunable at runtime once a run has
//! started.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub gate: GateConfig,
    pub risk: RiskConfig,
    pub fill: FillConfig,
    pub universe: UniverseConfig,
    pub session: SessionConfig,
}

/// Hard-veto thresholds for the policy gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Minimum signal confidence for an entry (e.g. 0.60).
    pub min_confidence: f64,
    /// Maximum spread as a percentage of premium.
    pub max_spread_pct: f64,
    /// Underlyings eligible for new entries.
    pub allowed_symbols: Vec<String>,
    /// No new entries at or after this time of day.
    pub entry_cutoff: NaiveTime,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.60,
            max_spread_pct: 20.0,
            allowed_symbols: vec!["SPY".to_string(), "QQQ".to_string()],
            entry_cutoff: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
        }
    }
}

/// Daily risk limits enforced by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Hard dollar loss limit per day; trading halts at or below it.
    pub daily_loss_limit: Decimal,
    pub max_trades_per_day: u32,
    pub starting_equity: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            daily_loss_limit: Decimal::from(-250),
            max_trades_per_day: 5,
            starting_equity: Decimal::from(10_000),
        }
    }
}

/// Conservative execution-cost assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillConfig {
    /// Fixed slippage per contract in dollars.
    pub fixed_slippage: Decimal,
    /// Fraction of the spread paid on estimated fills.
    pub spread_penalty: Decimal,
    /// A contract cannot be sold below this value.
    pub min_exit_value: Decimal,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            fixed_slippage: Decimal::new(5, 2),
            spread_penalty: Decimal::new(25, 2),
            min_exit_value: Decimal::new(1, 2),
        }
    }
}

/// Candidate enumeration and liquidity thresholds for the universe filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Strikes are enumerated within ±band of spot.
    pub strike_band: Decimal,
    pub strike_increment: Decimal,
    /// Contracts bid below this are ask-only and untradeable.
    pub min_bid: Decimal,
    /// Minimum depth on both sides of the book.
    pub min_size: u32,
    /// Maximum spread as a percentage of mid.
    pub max_spread_pct: f64,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            strike_band: Decimal::from(10),
            strike_increment: Decimal::ONE,
            min_bid: Decimal::new(1, 2),
            min_size: 1,
            max_spread_pct: 20.0,
        }
    }
}

/// Replay session shape: which symbols, which clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub symbols: Vec<String>,
    pub open: NaiveTime,
    pub close: NaiveTime,
    /// Minutes between evaluation timestamps.
    pub step_minutes: u32,
    pub contracts_per_trade: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            symbols: vec!["SPY".to_string(), "QQQ".to_string()],
            open: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            close: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            step_minutes: 30,
            contracts_per_trade: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn defaults_match_phase_zero_constants() {
        let config = EngineConfig::default();
        assert!((config.gate.min_confidence - 0.60).abs() < f64::EPSILON);
        assert_eq!(config.risk.daily_loss_limit, dec!(-250));
        assert_eq!(config.risk.max_trades_per_day, 5);
        assert_eq!(config.fill.fixed_slippage, dec!(0.05));
        assert_eq!(config.universe.min_bid, dec!(0.01));
        assert_eq!(config.session.step_minutes, 30);
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: EngineConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(
            deserialized.gate.allowed_symbols,
            config.gate.allowed_symbols
        );
        assert_eq!(deserialized.gate.entry_cutoff, config.gate.entry_cutoff);
        assert_eq!(deserialized.risk.starting_equity, config.risk.starting_equity);
    }
}
