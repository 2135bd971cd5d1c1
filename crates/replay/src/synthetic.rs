//! Synthetic quote source for offline replays and tests.
//!
//! Separated from the production path by construction: the engine takes
//! whatever [`QuoteSource`] it is given and nothing ever falls back to this
//! type implicitly. A deployment missing its live feed fails loudly instead
//! of silently degrading to synthetic data.

use anyhow::Result;
use async_trait::async_trait;
use odte_core::events::{MarketSnapshot, OptionQuote};
use odte_core::instrument::CandidateContract;
use odte_core::moves;
use odte_core::traits::QuoteSource;
use rust_decimal::Decimal;

/// Fabricates a plausible quote from the underlying snapshot: premium from
/// intrinsic value plus a volatility-scaled time value, bid/ask bracketed
/// at ±10%, generous depth.
#[derive(Debug, Clone, Default)]
pub struct SyntheticQuoteSource;

const BID_FRACTION: Decimal = Decimal::from_parts(90, 0, 0, false, 2);
const ASK_FRACTION: Decimal = Decimal::from_parts(110, 0, 0, false, 2);
const SYNTHETIC_DEPTH: u32 = 100;

impl SyntheticQuoteSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl QuoteSource for SyntheticQuoteSource {
    async fn option_quote(
        &self,
        contract: &CandidateContract,
        snapshot: &MarketSnapshot,
    ) -> Result<Option<OptionQuote>> {
        let premium = moves::estimate_premium(
            snapshot.price,
            contract.strike,
            contract.option_type,
            snapshot.vix,
        );

        Ok(Some(OptionQuote {
            bid: premium * BID_FRACTION,
            ask: premium * ASK_FRACTION,
            bid_size: SYNTHETIC_DEPTH,
            ask_size: SYNTHETIC_DEPTH,
        }))
    }
}
