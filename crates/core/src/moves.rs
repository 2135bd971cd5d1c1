//! Expected-move and breakeven arithmetic for same-day-expiring contracts.
//!
//! These are the only pieces of options math the admission pipeline needs:
//! how far the underlying is likely to travel before the close, and how far
//! it must travel for a contract to recover its premium.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::instrument::OptionType;

/// Divisor converting an annualized volatility index level into a one-day
/// move percentage (the market convention of VIX/16 ≈ daily 1σ move).
pub const VOL_TO_MOVE_DIVISOR: f64 = 16.0;

/// Fraction of a trading year remaining at the open for a same-day expiry:
/// one 6.5-hour session out of 252.
pub const ZERO_DTE_YEAR_FRACTION: f64 = 1.0 / (252.0 * 6.5);

/// Floor for estimated premiums; a listed contract never prices below this.
pub const MIN_PREMIUM: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Expected dollar move of the underlying before expiry, scaled from the
/// volatility index level.
#[must_use]
pub fn expected_move(spot: Decimal, vix: f64) -> Decimal {
    let fraction = (vix / VOL_TO_MOVE_DIVISOR) * ZERO_DTE_YEAR_FRACTION.sqrt();
    spot * to_decimal(fraction)
}

/// Dollar move the underlying must make for the contract to break even at
/// expiry. Positive means the move must be favorable; a negative value means
/// the contract is already in the money past its premium.
#[must_use]
pub fn breakeven_move(
    spot: Decimal,
    strike: Decimal,
    premium: Decimal,
    option_type: OptionType,
) -> Decimal {
    match option_type {
        OptionType::Call => (strike + premium) - spot,
        OptionType::Put => spot - (strike - premium),
    }
}

/// Rough premium estimate for offline mode: intrinsic value plus a
/// volatility-scaled time value, floored at [`MIN_PREMIUM`].
#[must_use]
pub fn estimate_premium(
    spot: Decimal,
    strike: Decimal,
    option_type: OptionType,
    vix: f64,
) -> Decimal {
    let intrinsic = match option_type {
        OptionType::Call => (spot - strike).max(Decimal::ZERO),
        OptionType::Put => (strike - spot).max(Decimal::ZERO),
    };

    let time_value_fraction = (vix / 100.0) * ZERO_DTE_YEAR_FRACTION.sqrt() * 0.1;
    let time_value = spot * to_decimal(time_value_fraction);

    (intrinsic + time_value).max(MIN_PREMIUM)
}

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_str(&format!("{value:.8}")).unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn expected_move_scales_with_vix() {
        let low = expected_move(dec!(590), 12.0);
        let high = expected_move(dec!(590), 24.0);
        assert!(high > low);
        assert!(high > Decimal::ZERO);
    }

    #[test]
    fn expected_move_doubles_when_vix_doubles() {
        let base = expected_move(dec!(500), 15.0);
        let doubled = expected_move(dec!(500), 30.0);
        let ratio = doubled / base;
        assert!(ratio > dec!(1.99) && ratio < dec!(2.01), "ratio was {ratio}");
    }

    #[test]
    fn breakeven_for_call_is_strike_plus_premium_minus_spot() {
        let be = breakeven_move(dec!(590), dec!(591), dec!(1.20), OptionType::Call);
        assert_eq!(be, dec!(2.20));
    }

    #[test]
    fn breakeven_for_put_is_spot_minus_strike_less_premium() {
        let be = breakeven_move(dec!(590), dec!(589), dec!(1.20), OptionType::Put);
        assert_eq!(be, dec!(2.20));
    }

    #[test]
    fn breakeven_negative_when_deep_in_the_money() {
        let be = breakeven_move(dec!(600), dec!(590), dec!(2.00), OptionType::Call);
        assert_eq!(be, dec!(-8.00));
    }

    #[test]
    fn estimate_premium_never_below_floor() {
        let premium = estimate_premium(dec!(590), dec!(600), OptionType::Call, 1.0);
        assert_eq!(premium, MIN_PREMIUM);
    }

    #[test]
    fn estimate_premium_includes_intrinsic_value() {
        let premium = estimate_premium(dec!(595), dec!(590), OptionType::Call, 15.0);
        assert!(premium > dec!(5.00));
    }

    #[test]
    fn estimate_premium_put_intrinsic() {
        let premium = estimate_premium(dec!(585), dec!(590), OptionType::Put, 15.0);
        assert!(premium > dec!(5.00));
    }
}
