//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod expense;
pub mod group;
pub mod user;

pub use expense::{ExpenseError, ExpenseRepository, ExpenseWithSplits, NewExpense};
pub use group::{GroupError, GroupRepository};
pub use user::{UserError, UserRepository};
