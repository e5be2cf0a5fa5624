//! Property-based tests for the split engine.
//!
//! Properties checked:
//! - Conservation: shares always sum to the total exactly
//! - Fairness: max share minus min share is at most one cent
//! - Determinism: identical input produces identical output

use proptest::prelude::*;
use rust_decimal::Decimal;

use divvy_shared::types::UserId;

use super::engine::split_equal;

/// Strategy to generate non-negative cent amounts (0.00 to 1,000,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate participant counts (1 to 1000).
fn participant_count() -> impl Strategy<Value = usize> {
    1usize..=1000
}

fn participants(n: usize) -> Vec<UserId> {
    (0..n).map(|_| UserId::new()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// For any total and non-empty participant set, the shares sum to the
    /// total with zero drift.
    #[test]
    fn prop_shares_conserve_total(total in amount(), n in participant_count()) {
        let members = participants(n);
        let shares = split_equal(total, &members).unwrap();

        let sum: Decimal = shares.iter().map(|s| s.amount_owed).sum();
        prop_assert_eq!(sum, total);
        prop_assert_eq!(shares.len(), n);
    }

    /// No share differs from another by more than one cent, and none is
    /// negative.
    #[test]
    fn prop_shares_are_fair(total in amount(), n in participant_count()) {
        let members = participants(n);
        let shares = split_equal(total, &members).unwrap();

        let max = shares.iter().map(|s| s.amount_owed).max().unwrap();
        let min = shares.iter().map(|s| s.amount_owed).min().unwrap();
        prop_assert!(max - min <= Decimal::new(1, 2));
        prop_assert!(!min.is_sign_negative());
    }

    /// Splitting twice with the same input yields the same shares in the
    /// same order.
    #[test]
    fn prop_split_is_deterministic(total in amount(), n in participant_count()) {
        let members = participants(n);
        let first = split_equal(total, &members).unwrap();
        let second = split_equal(total, &members).unwrap();

        prop_assert_eq!(first, second);
    }

    /// The residual cents always land on the earliest participants.
    #[test]
    fn prop_residual_goes_to_leading_participants(total in amount(), n in participant_count()) {
        let members = participants(n);
        let shares = split_equal(total, &members).unwrap();

        // Shares must be non-increasing in participant order.
        for pair in shares.windows(2) {
            prop_assert!(pair[0].amount_owed >= pair[1].amount_owed);
        }
    }
}
