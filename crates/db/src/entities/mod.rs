//! `SeaORM` entity definitions.

pub mod expense_splits;
pub mod expenses;
pub mod group_members;
pub mod groups;
pub mod sea_orm_active_enums;
pub mod users;
