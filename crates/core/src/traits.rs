//! Seams to the engine's external collaborators.
//!
//! All three are injected: the orchestrator never constructs its own data
//! sources, so a replay run and a live session exercise identical code.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::events::{MarketSnapshot, OptionQuote};
use crate::instrument::CandidateContract;
use crate::signal::SignalOutput;

/// A pretrained decision signal.
///
/// Treated as frozen for the duration of a run; implementations must not
/// learn from or otherwise react to replay outcomes.
#[async_trait]
pub trait DecisionSignal: Send + Sync {
    async fn evaluate(&self, snapshot: &MarketSnapshot) -> Result<SignalOutput>;

    fn name(&self) -> &str;
}

/// Source of option quotes.
///
/// `Ok(None)` means the contract does not exist for trading purposes. That
/// is the designed skip path, not an error. The underlying snapshot is provided as
/// context so offline implementations can price synthetically; live
/// implementations ignore it.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn option_quote(
        &self,
        contract: &CandidateContract,
        snapshot: &MarketSnapshot,
    ) -> Result<Option<OptionQuote>>;
}

/// Point-in-time underlying market data.
///
/// A snapshot for time `at` must never reflect bars after `at`; a missing
/// or too-stale bar is `Ok(None)` and the caller skips the tick.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn snapshot(&self, symbol: &str, at: DateTime<Utc>) -> Result<Option<MarketSnapshot>>;
}
