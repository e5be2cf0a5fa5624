//! Equal-split settlement computation.
//!
//! Splitting an expense across group members is the one place where naive
//! per-member rounding loses or gains cents. This module guarantees that the
//! shares always sum to the original amount, to the cent.

pub mod engine;
pub mod error;

#[cfg(test)]
mod props;

pub use engine::{Share, split_equal};
pub use error::SplitError;
