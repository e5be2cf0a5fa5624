//! Equal allocation using integer residual distribution.
//!
//! The approach is the equal-weight case of the Largest Remainder Method:
//! 1. Round the per-participant quotient down to whole cents (the base share)
//! 2. Compute the residual `total - base * n`, a whole number of cents
//! 3. Hand the residual out one cent at a time, in participant order
//!
//! Step 3 is what guarantees exact conservation: rounding every share
//! independently can drift from the total by up to `n - 1` cents.

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

use divvy_shared::types::{CENT, UserId, validate_amount};

use super::error::SplitError;

/// One participant's computed share of a split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Share {
    /// The participant owing this share.
    pub user_id: UserId,
    /// The amount owed, in whole cents.
    pub amount_owed: Decimal,
}

/// Splits `total` equally across `participants`, conserving every cent.
///
/// Each participant receives the floor of the equal share; the leftover
/// cents (always fewer than the participant count) go to the **first**
/// participants in the given order, one cent each. Callers that need a
/// reproducible result must therefore pass participants in a stable order.
///
/// The returned shares:
/// - contain exactly one entry per participant, in input order
/// - are non-negative and quantized to cents
/// - sum to `total` exactly
/// - differ from one another by at most one cent
///
/// # Errors
///
/// Returns `SplitError::EmptyParticipants` if `participants` is empty, and
/// `SplitError::InvalidAmount` if `total` is negative or has sub-cent
/// precision.
pub fn split_equal(total: Decimal, participants: &[UserId]) -> Result<Vec<Share>, SplitError> {
    if participants.is_empty() {
        return Err(SplitError::EmptyParticipants);
    }
    if !validate_amount(total) {
        return Err(SplitError::InvalidAmount(total));
    }

    let count = Decimal::from(participants.len() as u64);

    // Base share: the equal quotient rounded down to whole cents.
    let base = (total / count).round_dp_with_strategy(2, RoundingStrategy::ToZero);

    // Residual is a whole number of cents, 0 <= residual_cents < n.
    let residual = total - base * count;
    let residual_cents = (residual / CENT)
        .round_dp_with_strategy(0, RoundingStrategy::ToZero)
        .to_usize()
        .unwrap_or(0);

    Ok(participants
        .iter()
        .enumerate()
        .map(|(i, &user_id)| Share {
            user_id,
            amount_owed: if i < residual_cents { base + CENT } else { base },
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn users(n: usize) -> Vec<UserId> {
        (0..n).map(|_| UserId::new()).collect()
    }

    fn sum(shares: &[Share]) -> Decimal {
        shares.iter().map(|s| s.amount_owed).sum()
    }

    #[test]
    fn test_ten_dollars_across_three() {
        let participants = users(3);
        let shares = split_equal(dec!(10.00), &participants).unwrap();

        // The first participant absorbs the leftover cent.
        assert_eq!(shares[0].amount_owed, dec!(3.34));
        assert_eq!(shares[1].amount_owed, dec!(3.33));
        assert_eq!(shares[2].amount_owed, dec!(3.33));
        assert_eq!(sum(&shares), dec!(10.00));
    }

    #[test]
    fn test_one_cent_across_four() {
        let participants = users(4);
        let shares = split_equal(dec!(0.01), &participants).unwrap();

        assert_eq!(shares[0].amount_owed, dec!(0.01));
        assert_eq!(shares[1].amount_owed, dec!(0.00));
        assert_eq!(shares[2].amount_owed, dec!(0.00));
        assert_eq!(shares[3].amount_owed, dec!(0.00));
        assert_eq!(sum(&shares), dec!(0.01));
    }

    #[test]
    fn test_even_split_has_no_residual() {
        let participants = users(4);
        let shares = split_equal(dec!(100.00), &participants).unwrap();

        assert!(shares.iter().all(|s| s.amount_owed == dec!(25.00)));
    }

    #[test]
    fn test_single_participant_owes_everything() {
        let participants = users(1);
        let shares = split_equal(dec!(42.37), &participants).unwrap();

        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].amount_owed, dec!(42.37));
    }

    #[test]
    fn test_zero_total_splits_to_zero() {
        let participants = users(3);
        let shares = split_equal(dec!(0), &participants).unwrap();

        assert!(shares.iter().all(|s| s.amount_owed.is_zero()));
    }

    #[test]
    fn test_shares_preserve_participant_order() {
        let participants = users(5);
        let shares = split_equal(dec!(7.77), &participants).unwrap();

        let returned: Vec<UserId> = shares.iter().map(|s| s.user_id).collect();
        assert_eq!(returned, participants);
    }

    #[test]
    fn test_empty_participants_rejected() {
        assert_eq!(
            split_equal(dec!(10.00), &[]),
            Err(SplitError::EmptyParticipants)
        );
    }

    #[test]
    fn test_negative_amount_rejected() {
        let participants = users(2);
        assert_eq!(
            split_equal(dec!(-1.00), &participants),
            Err(SplitError::InvalidAmount(dec!(-1.00)))
        );
    }

    #[test]
    fn test_sub_cent_amount_rejected() {
        let participants = users(2);
        assert_eq!(
            split_equal(dec!(1.005), &participants),
            Err(SplitError::InvalidAmount(dec!(1.005)))
        );
    }

    #[test]
    fn test_conservation_over_awkward_cases() {
        // Amounts chosen to not divide evenly - sum must always equal total.
        let cases = [
            (dec!(100.00), 3),
            (dec!(100.00), 7),
            (dec!(0.05), 3),
            (dec!(999.99), 7),
            (dec!(1.00), 1000),
            (dec!(0.01), 1000),
        ];

        for (total, n) in cases {
            let participants = users(n);
            let shares = split_equal(total, &participants).unwrap();
            assert_eq!(shares.len(), n);
            assert_eq!(sum(&shares), total, "drift for total={total}, n={n}");
        }
    }
}
