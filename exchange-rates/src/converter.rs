//! Currency conversion between local and stored amounts.
//!
//! Results always carry two fractional digits, rounded half-up.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ConversionError;
use crate::rate::ExchangeRate;

/// Fractional digits kept on converted amounts.
pub const AMOUNT_SCALE: u32 = 2;

/// Converts an amount in local currency to stored currency.
///
/// `amount_stored = amount_local / rate`, rounded to two places. Zero and
/// negative rates are rejected before any division happens.
pub fn to_stored(amount_local: Decimal, rate: &ExchangeRate) -> Result<Decimal, ConversionError> {
    if amount_local.is_sign_negative() && !amount_local.is_zero() {
        return Err(ConversionError::InvalidAmount(amount_local));
    }
    let rate = positive_rate(rate)?;

    let stored = amount_local
        .checked_div(rate)
        .ok_or(ConversionError::InvalidAmount(amount_local))?;
    Ok(round_amount(stored))
}

/// Converts an amount in stored currency back to local currency.
pub fn to_local(amount_stored: Decimal, rate: &ExchangeRate) -> Result<Decimal, ConversionError> {
    if amount_stored.is_sign_negative() && !amount_stored.is_zero() {
        return Err(ConversionError::InvalidAmount(amount_stored));
    }
    let rate = positive_rate(rate)?;

    let local = amount_stored
        .checked_mul(rate)
        .ok_or(ConversionError::InvalidAmount(amount_stored))?;
    Ok(round_amount(local))
}

/// Rounds to [`AMOUNT_SCALE`] places, half-up.
///
/// Inputs are non-negative here, so away-from-zero on the midpoint is half-up.
pub fn round_amount(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

fn positive_rate(rate: &ExchangeRate) -> Result<Decimal, ConversionError> {
    let value = rate.value();
    if value <= Decimal::ZERO {
        return Err(ConversionError::InvalidRate(value));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use proptest::prelude::*;

    use super::*;
    use crate::currency::CurrencyPair;

    fn rate(value: &str) -> ExchangeRate {
        ExchangeRate::new(
            Decimal::from_str(value).unwrap(),
            CurrencyPair::USD_BRL,
            "test",
        )
    }

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_to_stored_exact_division() {
        assert_eq!(to_stored(dec("100000"), &rate("5")).unwrap(), dec("20000.00"));
        assert_eq!(to_stored(dec("150000"), &rate("5")).unwrap(), dec("30000.00"));
    }

    #[test]
    fn test_to_stored_rounds_half_up() {
        // 0.125 / 1 sits exactly on the midpoint
        assert_eq!(to_stored(dec("0.125"), &rate("1")).unwrap(), dec("0.13"));
        // 10 / 3 = 3.333...
        assert_eq!(to_stored(dec("10"), &rate("3")).unwrap(), dec("3.33"));
        // 20 / 3 = 6.666...
        assert_eq!(to_stored(dec("20"), &rate("3")).unwrap(), dec("6.67"));
    }

    #[test]
    fn test_to_stored_scale_is_two() {
        let stored = to_stored(dec("100"), &rate("5.25")).unwrap();
        assert_eq!(stored, dec("19.05"));
        assert_eq!(stored.scale(), 2);
    }

    #[test]
    fn test_zero_amount_is_allowed() {
        assert_eq!(to_stored(Decimal::ZERO, &rate("5")).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_negative_amount_fails() {
        let result = to_stored(dec("-1"), &rate("5"));
        assert!(matches!(result, Err(ConversionError::InvalidAmount(_))));
    }

    #[test]
    fn test_zero_rate_fails() {
        let result = to_stored(dec("100"), &rate("0"));
        assert!(matches!(result, Err(ConversionError::InvalidRate(_))));
    }

    #[test]
    fn test_negative_rate_fails() {
        let result = to_stored(dec("100"), &rate("-5"));
        assert!(matches!(result, Err(ConversionError::InvalidRate(_))));
    }

    #[test]
    fn test_to_local() {
        assert_eq!(to_local(dec("20000"), &rate("5.25")).unwrap(), dec("105000.00"));
    }

    proptest! {
        #[test]
        fn prop_round_trip_within_a_cent(
            cents in 0i64..100_000_000_000,
            rate_milli in 1i64..50_000,
        ) {
            let amount = Decimal::new(cents, 2);
            let rate = ExchangeRate::new(Decimal::new(rate_milli, 3), CurrencyPair::USD_BRL, "prop");

            let stored = to_stored(amount, &rate).unwrap();
            prop_assert_eq!(stored, to_stored(amount, &rate).unwrap());

            // Rounding the stored amount moves it by at most half a cent,
            // which the multiplication scales by the rate.
            let back = to_local(stored, &rate).unwrap();
            let tolerance = Decimal::new(1, 2) * rate.value().max(Decimal::ONE);
            prop_assert!((back - amount).abs() <= tolerance);
        }
    }
}
