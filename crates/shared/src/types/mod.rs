//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{CENT, has_cent_precision, validate_amount};
