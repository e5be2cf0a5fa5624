//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! All amounts are `rust_decimal::Decimal` values quantized to cents.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// One minor currency unit (a cent).
pub const CENT: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Returns true if the amount is representable in whole cents.
#[must_use]
pub fn has_cent_precision(amount: Decimal) -> bool {
    amount == amount.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

/// Validates that an amount is a well-formed monetary value:
/// non-negative, with at most two fractional digits.
#[must_use]
pub fn validate_amount(amount: Decimal) -> bool {
    !amount.is_sign_negative() && has_cent_precision(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cent_value() {
        assert_eq!(CENT, dec!(0.01));
    }

    #[test]
    fn test_has_cent_precision() {
        assert!(has_cent_precision(dec!(10)));
        assert!(has_cent_precision(dec!(10.5)));
        assert!(has_cent_precision(dec!(10.55)));
        assert!(!has_cent_precision(dec!(10.555)));
        assert!(!has_cent_precision(dec!(0.001)));
    }

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(dec!(0)));
        assert!(validate_amount(dec!(0.01)));
        assert!(validate_amount(dec!(999999.99)));
        assert!(!validate_amount(dec!(-0.01)));
        assert!(!validate_amount(dec!(1.005)));
    }
}
