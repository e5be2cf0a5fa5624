//! Active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// How an expense is divided among group members.
///
/// Only `Equal` has a code path; `Exact` and `Percentage` exist in the
/// schema for forward compatibility and are deliberately unimplemented.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "split_type")]
pub enum SplitType {
    /// Divide equally among all members.
    #[sea_orm(string_value = "equal")]
    Equal,
    /// Per-member exact amounts (schema-only, not implemented).
    #[sea_orm(string_value = "exact")]
    Exact,
    /// Per-member percentages (schema-only, not implemented).
    #[sea_orm(string_value = "percentage")]
    Percentage,
}
