//! Stored-currency prices.
//!
//! Prices are held as `Decimal` with two fractional digits in the domain and
//! persisted as integer cents, the same minor-unit representation every
//! adapter can compare natively.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::DomainError;

/// Fractional digits of a stored price.
pub const PRICE_SCALE: u32 = 2;

/// Checks that a price is non-negative, has at most two decimals and fits in
/// `i64` cents.
pub fn validate_price(price: Decimal) -> Result<(), DomainError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(DomainError::NegativePrice);
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(DomainError::ValidationError(format!(
            "Price {} has more than {} decimal places",
            price, PRICE_SCALE
        )));
    }
    if checked_cents(price).is_none() {
        return Err(out_of_range(price));
    }
    Ok(())
}

/// Converts a price into integer cents.
pub fn to_cents(price: Decimal) -> Result<i64, DomainError> {
    validate_price(price)?;
    checked_cents(price).ok_or_else(|| out_of_range(price))
}

/// Converts bound values that may carry more precision, rounding to the cent.
///
/// Returns `None` when the rounded bound lies outside the `i64` cent range.
pub fn bound_to_cents(bound: Decimal) -> Option<i64> {
    checked_cents(exchange_rates::round_amount(bound))
}

fn checked_cents(amount: Decimal) -> Option<i64> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.to_i64())
}

fn out_of_range(price: Decimal) -> DomainError {
    DomainError::ValidationError(format!("Price {} is out of range", price))
}

/// Converts integer cents back into a two-digit price.
pub fn from_cents(cents: i64) -> Decimal {
    Decimal::new(cents, PRICE_SCALE)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_cents_round_trip() {
        let price = Decimal::from_str("20000.50").unwrap();
        let cents = to_cents(price).unwrap();
        assert_eq!(cents, 2_000_050);
        assert_eq!(from_cents(cents), price);
    }

    #[test]
    fn test_whole_price_to_cents() {
        assert_eq!(to_cents(Decimal::from(150)).unwrap(), 15_000);
    }

    #[test]
    fn test_negative_price_rejected() {
        let result = to_cents(Decimal::from(-1));
        assert!(matches!(result, Err(DomainError::NegativePrice)));
    }

    #[test]
    fn test_sub_cent_price_rejected() {
        let result = validate_price(Decimal::from_str("10.005").unwrap());
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_trailing_zeros_are_fine() {
        assert!(validate_price(Decimal::from_str("10.5000").unwrap()).is_ok());
    }

    #[test]
    fn test_price_beyond_cent_range_rejected() {
        let price = Decimal::MAX;
        assert!(matches!(
            validate_price(price),
            Err(DomainError::ValidationError(_))
        ));
        assert!(matches!(to_cents(price), Err(DomainError::ValidationError(_))));
    }

    #[test]
    fn test_largest_cent_price_accepted() {
        let price = from_cents(i64::MAX);
        assert_eq!(to_cents(price).unwrap(), i64::MAX);
    }

    #[test]
    fn test_bound_to_cents_rounds_half_up() {
        let bound = Decimal::from_str("19.045").unwrap();
        assert_eq!(bound_to_cents(bound), Some(1_905));
    }

    #[test]
    fn test_huge_bound_has_no_cent_value() {
        assert_eq!(bound_to_cents(Decimal::MAX), None);
        assert_eq!(bound_to_cents(Decimal::MIN), None);
    }

    #[test]
    fn test_from_cents_display() {
        assert_eq!(from_cents(2_000_000).to_string(), "20000.00");
    }
}
