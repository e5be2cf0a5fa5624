//! Core business logic for Divvy.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain calculations and validation rules live here.
//!
//! # Modules
//!
//! - `split` - Equal-split settlement computation with exact cent conservation
//! - `auth` - Password hashing

pub mod auth;
pub mod split;
