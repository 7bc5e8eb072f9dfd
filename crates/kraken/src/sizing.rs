//! Order sizing: budget and bid price in, limit price and volume out.

use rust_decimal::Decimal;

use common::{Error, Result};

/// Decimal places a limit price is truncated to before submission.
pub const PRICE_SCALE: u32 = 6;

/// Parse a price string into a decimal. Rejects anything unparsable before
/// a request can be built from it.
pub fn parse_price(raw: &str) -> Result<Decimal> {
    raw.trim()
        .parse::<Decimal>()
        .map_err(|_| Error::Validation(format!("price is not a valid decimal: '{raw}'")))
}

/// Truncate toward zero to `scale` decimal places.
///
/// Truncation direction matters: rounding a bid price up would place the
/// order above market intent, so excess digits are always dropped.
pub fn truncate_price(price: Decimal, scale: u32) -> Decimal {
    price.trunc_with_scale(scale)
}

/// Trade volume for a budget at a limit price: `budget / price` at full
/// division precision.
///
/// Deliberately not truncated: price is the conservative side, and the
/// exchange's own lot-size rules govern volume acceptance.
pub fn compute_volume(budget: Decimal, price: Decimal) -> Result<Decimal> {
    if price.is_zero() || price.is_sign_negative() {
        return Err(Error::Validation(format!(
            "price must be positive, got {price}"
        )));
    }
    Ok(budget / price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn truncation_drops_excess_digits_without_rounding_up() {
        assert_eq!(truncate_price(dec!(1.23456789), 6), dec!(1.234567));
        assert_eq!(truncate_price(dec!(50000.123456789), 6), dec!(50000.123456));
    }

    #[test]
    fn truncation_leaves_short_prices_untouched() {
        assert_eq!(truncate_price(dec!(37500), 6), dec!(37500));
        assert_eq!(truncate_price(dec!(0.5), 6), dec!(0.5));
    }

    #[test]
    fn truncated_price_formats_as_fixed_decimal_string() {
        assert_eq!(
            truncate_price(dec!(50000.123456789), 6).to_string(),
            "50000.123456"
        );
    }

    #[test]
    fn volume_is_budget_over_price() {
        assert_eq!(compute_volume(dec!(100), dec!(50)).unwrap(), dec!(2));
    }

    #[test]
    fn volume_keeps_full_division_precision() {
        let volume = compute_volume(dec!(1000), dec!(50000.123456)).unwrap();
        // Not truncated to the price scale.
        assert!(volume.scale() > PRICE_SCALE);
        assert!(volume > dec!(0.0199999) && volume < dec!(0.02));
    }

    #[test]
    fn zero_price_is_a_validation_error() {
        let err = compute_volume(dec!(100), Decimal::ZERO).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn unparsable_price_is_a_validation_error() {
        let err = parse_price("not-a-price").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn parse_price_accepts_exchange_formatted_strings() {
        assert_eq!(parse_price("50000.123456789").unwrap(), dec!(50000.123456789));
    }
}
