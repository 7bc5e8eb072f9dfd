use proptest::prelude::*;
use rust_decimal::Decimal;
use secrecy::SecretString;

use kraken::{sign, sizing};

proptest! {
    /// Two signatures over identical inputs must be byte-identical.
    #[test]
    fn signing_is_deterministic(
        path in "/0/private/[A-Za-z]{1,12}",
        nonce in 1u64..=u64::MAX / 2,
        body in "[a-z0-9=&]{0,64}",
    ) {
        let secret = SecretString::from("a2V5LW1hdGVyaWFsLWZvci10ZXN0aW5n");
        let nonce = nonce.to_string();
        let first = sign::sign(&path, &body, &nonce, &secret).unwrap();
        let second = sign::sign(&path, &body, &nonce, &secret).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Price truncation must never round up, and never drop more than one
    /// unit in the last kept decimal place.
    #[test]
    fn truncation_never_rounds_up(
        units in 0i64..1_000_000_000_000i64,
        scale in 0u32..12,
    ) {
        let price = Decimal::new(units, scale);
        let truncated = sizing::truncate_price(price, sizing::PRICE_SCALE);
        prop_assert!(truncated <= price);
        prop_assert!(price - truncated < Decimal::new(1, sizing::PRICE_SCALE));
    }

    /// Sizing never panics and yields a positive volume for positive inputs.
    #[test]
    fn volume_is_positive_for_positive_inputs(
        budget in 1u64..10_000_000u64,
        price_units in 1i64..1_000_000_000_000i64,
    ) {
        let budget = Decimal::from(budget);
        let price = Decimal::new(price_units, 6);
        let volume = sizing::compute_volume(budget, price).unwrap();
        prop_assert!(volume > Decimal::ZERO);
    }
}
