use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use odte_core::config::UniverseConfig;
use odte_core::events::MarketSnapshot;
use odte_core::instrument::{CandidateContract, OptionType, TradeableInstrument};
use odte_core::traits::QuoteSource;
use rust_decimal::Decimal;
use tracing::debug;

/// Narrows the full option chain down to contracts with tradeable liquidity.
///
/// Quotes come through the injected [`QuoteSource`]; a missing quote means
/// the contract does not exist for trading and is silently skipped.
pub struct UniverseFilter {
    quotes: Arc<dyn QuoteSource>,
    config: UniverseConfig,
}

impl UniverseFilter {
    #[must_use]
    pub fn new(quotes: Arc<dyn QuoteSource>, config: UniverseConfig) -> Self {
        Self { quotes, config }
    }

    /// Enumerates candidate contracts in fixed strike increments within
    /// ±strike_band of spot for the given same-day expiry. Synthetic symbol
    /// construction only; no quotes are consulted here.
    #[must_use]
    pub fn generate_candidates(
        &self,
        underlying: &str,
        spot: Decimal,
        trading_day: NaiveDate,
        option_type: OptionType,
    ) -> Vec<CandidateContract> {
        let increment = self.config.strike_increment;
        if increment <= Decimal::ZERO {
            return Vec::new();
        }

        let min_strike = ((spot - self.config.strike_band) / increment).floor() * increment;
        let max_strike = spot + self.config.strike_band;

        let mut candidates = Vec::new();
        let mut strike = min_strike;
        while strike <= max_strike {
            if strike > Decimal::ZERO {
                candidates.push(CandidateContract::new(
                    underlying,
                    trading_day,
                    option_type,
                    strike,
                ));
            }
            strike += increment;
        }

        candidates
    }

    /// Filters candidates by liquidity, in order: a present bid above the
    /// minimum, sufficient depth on both sides, and a spread within the
    /// configured ceiling. Survivors carry the quote that admitted them.
    ///
    /// # Errors
    /// Returns an error if the quote source itself fails; a candidate with
    /// no quote is not an error and is skipped.
    pub async fn filter_by_liquidity(
        &self,
        candidates: &[CandidateContract],
        snapshot: &MarketSnapshot,
    ) -> Result<Vec<TradeableInstrument>> {
        let mut tradeable = Vec::new();

        for candidate in candidates {
            let Some(quote) = self.quotes.option_quote(candidate, snapshot).await? else {
                continue;
            };

            // Ask-only contracts: a bid of zero or near-zero means no one
            // will buy it back, untradeable regardless of nominal price.
            if quote.bid < self.config.min_bid {
                debug!(symbol = candidate.symbol, bid = %quote.bid, "rejected: bid below minimum");
                continue;
            }

            if quote.bid_size < self.config.min_size || quote.ask_size < self.config.min_size {
                debug!(symbol = candidate.symbol, "rejected: insufficient depth");
                continue;
            }

            let instrument = TradeableInstrument::from_quote(candidate, &quote);
            if instrument.spread_pct > self.config.max_spread_pct {
                debug!(
                    symbol = candidate.symbol,
                    spread_pct = instrument.spread_pct,
                    "rejected: spread too wide"
                );
                continue;
            }

            tradeable.push(instrument);
        }

        Ok(tradeable)
    }

    /// Picks the surviving contract of the requested type whose strike is
    /// closest to spot; ties go to the lower strike for determinism.
    /// `None` is the sanctioned "do nothing" outcome; a symbol is never
    /// fabricated to fill the gap.
    #[must_use]
    pub fn select_best<'a>(
        &self,
        tradeable: &'a [TradeableInstrument],
        spot: Decimal,
        option_type: OptionType,
    ) -> Option<&'a TradeableInstrument> {
        let mut best: Option<&TradeableInstrument> = None;

        for instrument in tradeable.iter().filter(|i| i.option_type == option_type) {
            let distance = (instrument.strike - spot).abs();
            match best {
                None => best = Some(instrument),
                Some(current) => {
                    let current_distance = (current.strike - spot).abs();
                    if distance < current_distance
                        || (distance == current_distance && instrument.strike < current.strike)
                    {
                        best = Some(instrument);
                    }
                }
            }
        }

        best
    }

    /// Convenience: enumerate and filter in one call.
    ///
    /// # Errors
    /// Returns an error if the quote source fails.
    pub async fn tradeable(
        &self,
        underlying: &str,
        snapshot: &MarketSnapshot,
        trading_day: NaiveDate,
        option_type: OptionType,
    ) -> Result<Vec<TradeableInstrument>> {
        let candidates =
            self.generate_candidates(underlying, snapshot.price, trading_day, option_type);
        self.filter_by_liquidity(&candidates, snapshot).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveTime, TimeZone, Utc};
    use odte_core::events::OptionQuote;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    /// Quote source backed by a fixed map; unknown symbols have no quote.
    struct MapQuotes(HashMap<String, OptionQuote>);

    #[async_trait]
    impl QuoteSource for MapQuotes {
        async fn option_quote(
            &self,
            contract: &CandidateContract,
            _snapshot: &MarketSnapshot,
        ) -> Result<Option<OptionQuote>> {
            Ok(self.0.get(&contract.symbol).copied())
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 16).unwrap()
    }

    fn snapshot(price: Decimal) -> MarketSnapshot {
        MarketSnapshot {
            symbol: "SPY".to_string(),
            price,
            vix: 16.0,
            time_of_day: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            timestamp: Utc.with_ymd_and_hms(2025, 12, 16, 15, 0, 0).unwrap(),
        }
    }

    fn quote(bid: Decimal, ask: Decimal, bid_size: u32, ask_size: u32) -> OptionQuote {
        OptionQuote {
            bid,
            ask,
            bid_size,
            ask_size,
        }
    }

    fn filter_with(quotes: HashMap<String, OptionQuote>) -> UniverseFilter {
        UniverseFilter::new(Arc::new(MapQuotes(quotes)), UniverseConfig::default())
    }

    #[test]
    fn candidates_span_the_strike_band() {
        let filter = filter_with(HashMap::new());
        let candidates =
            filter.generate_candidates("SPY", dec!(590.40), day(), OptionType::Call);

        // Band is ±10 in $1 increments: 580..=600.
        assert_eq!(candidates.len(), 21);
        assert_eq!(candidates.first().unwrap().strike, dec!(580));
        assert_eq!(candidates.last().unwrap().strike, dec!(600));
        assert_eq!(candidates[0].symbol, "SPY251216C00580000");
    }

    #[tokio::test]
    async fn missing_quotes_are_skipped_not_errors() {
        let filter = filter_with(HashMap::new());
        let candidates = filter.generate_candidates("SPY", dec!(590), day(), OptionType::Call);

        let tradeable = filter
            .filter_by_liquidity(&candidates, &snapshot(dec!(590)))
            .await
            .unwrap();
        assert!(tradeable.is_empty());
    }

    #[tokio::test]
    async fn zero_bid_contract_excluded() {
        let mut quotes = HashMap::new();
        quotes.insert(
            "SPY251216C00590000".to_string(),
            quote(dec!(0), dec!(0.45), 0, 50),
        );
        let filter = filter_with(quotes);

        let candidates = filter.generate_candidates("SPY", dec!(590), day(), OptionType::Call);
        let tradeable = filter
            .filter_by_liquidity(&candidates, &snapshot(dec!(590)))
            .await
            .unwrap();

        assert!(tradeable.is_empty());
        // The only candidate was untradeable, so selection yields none.
        assert!(filter
            .select_best(&tradeable, dec!(590), OptionType::Call)
            .is_none());
    }

    #[tokio::test]
    async fn thin_depth_excluded() {
        let mut quotes = HashMap::new();
        quotes.insert(
            "SPY251216C00590000".to_string(),
            quote(dec!(1.00), dec!(1.10), 0, 50),
        );
        let filter = filter_with(quotes);

        let candidates = filter.generate_candidates("SPY", dec!(590), day(), OptionType::Call);
        let tradeable = filter
            .filter_by_liquidity(&candidates, &snapshot(dec!(590)))
            .await
            .unwrap();
        assert!(tradeable.is_empty());
    }

    #[tokio::test]
    async fn wide_spread_excluded() {
        let mut quotes = HashMap::new();
        // Spread 0.40 on mid 1.00 = 40% of mid, over the 20% ceiling.
        quotes.insert(
            "SPY251216C00590000".to_string(),
            quote(dec!(0.80), dec!(1.20), 10, 10),
        );
        let filter = filter_with(quotes);

        let candidates = filter.generate_candidates("SPY", dec!(590), day(), OptionType::Call);
        let tradeable = filter
            .filter_by_liquidity(&candidates, &snapshot(dec!(590)))
            .await
            .unwrap();
        assert!(tradeable.is_empty());
    }

    #[tokio::test]
    async fn surviving_contract_keeps_its_quote() {
        let mut quotes = HashMap::new();
        quotes.insert(
            "SPY251216C00590000".to_string(),
            quote(dec!(1.00), dec!(1.10), 25, 25),
        );
        let filter = filter_with(quotes);

        let candidates = filter.generate_candidates("SPY", dec!(590), day(), OptionType::Call);
        let tradeable = filter
            .filter_by_liquidity(&candidates, &snapshot(dec!(590)))
            .await
            .unwrap();

        assert_eq!(tradeable.len(), 1);
        let inst = &tradeable[0];
        assert_eq!(inst.bid, dec!(1.00));
        assert_eq!(inst.ask, dec!(1.10));
        assert_eq!(inst.mid, dec!(1.05));
        assert_eq!(inst.strike, dec!(590));
    }

    #[tokio::test]
    async fn select_best_picks_strike_closest_to_spot() {
        let mut quotes = HashMap::new();
        for strike in [588, 590, 592] {
            quotes.insert(
                format!("SPY251216C00{strike}000"),
                quote(dec!(1.00), dec!(1.10), 25, 25),
            );
        }
        let filter = filter_with(quotes);

        let candidates = filter.generate_candidates("SPY", dec!(590.40), day(), OptionType::Call);
        let tradeable = filter
            .filter_by_liquidity(&candidates, &snapshot(dec!(590.40)))
            .await
            .unwrap();

        let best = filter
            .select_best(&tradeable, dec!(590.40), OptionType::Call)
            .unwrap();
        assert_eq!(best.strike, dec!(590));
    }

    #[tokio::test]
    async fn select_best_tie_goes_to_lower_strike() {
        let mut quotes = HashMap::new();
        for strike in [589, 591] {
            quotes.insert(
                format!("SPY251216C00{strike}000"),
                quote(dec!(1.00), dec!(1.10), 25, 25),
            );
        }
        let filter = filter_with(quotes);

        let candidates = filter.generate_candidates("SPY", dec!(590), day(), OptionType::Call);
        let tradeable = filter
            .filter_by_liquidity(&candidates, &snapshot(dec!(590)))
            .await
            .unwrap();

        let best = filter
            .select_best(&tradeable, dec!(590), OptionType::Call)
            .unwrap();
        assert_eq!(best.strike, dec!(589));
    }

    #[test]
    fn select_best_ignores_other_option_type() {
        let filter = filter_with(HashMap::new());
        let contract = CandidateContract::new("SPY", day(), OptionType::Put, dec!(590));
        let instruments = vec![TradeableInstrument::from_quote(
            &contract,
            &quote(dec!(1.00), dec!(1.10), 25, 25),
        )];

        assert!(filter
            .select_best(&instruments, dec!(590), OptionType::Call)
            .is_none());
    }
}
