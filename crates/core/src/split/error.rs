//! Split engine error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors from the split engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SplitError {
    /// Amount is negative or has sub-cent precision.
    #[error("invalid amount: {0}")]
    InvalidAmount(Decimal),

    /// No participants to split across.
    #[error("cannot split across an empty participant set")]
    EmptyParticipants,
}
