//! Expense repository: expense intake and listing.
//!
//! Recording an expense resolves the group's member list, computes the
//! equal split, and persists the expense plus every split row in a single
//! transaction. Either everything lands or nothing does; an expense without
//! its splits is never observable.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use divvy_core::split::{SplitError, split_equal};
use divvy_shared::AppError;
use divvy_shared::types::UserId;

use crate::entities::{
    expense_splits, expenses, group_members, groups, sea_orm_active_enums::SplitType,
};

/// Error types for expense operations.
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    /// Group not found.
    #[error("Group not found: {0}")]
    GroupNotFound(Uuid),

    /// Requesting user is not a member of the group.
    #[error("User is not a member of this group")]
    NotAMember,

    /// Group has no members to split across.
    #[error("Group has no members")]
    EmptyGroup,

    /// Split computation rejected the amount.
    #[error(transparent)]
    Split(#[from] SplitError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<ExpenseError> for AppError {
    fn from(err: ExpenseError) -> Self {
        match err {
            ExpenseError::GroupNotFound(id) => Self::NotFound(format!("Group {id}")),
            ExpenseError::NotAMember => Self::Forbidden(
                "You are not a member of this group and cannot add expenses".to_string(),
            ),
            ExpenseError::EmptyGroup => {
                Self::BusinessRule("Cannot split an expense: the group has no members".to_string())
            }
            ExpenseError::Split(SplitError::InvalidAmount(_)) => Self::Validation(
                "Amount must be positive with at most two decimal places".to_string(),
            ),
            ExpenseError::Split(e) => Self::Internal(e.to_string()),
            ExpenseError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for recording a new expense.
#[derive(Debug, Clone)]
pub struct NewExpense {
    /// Group the expense belongs to.
    pub group_id: Uuid,
    /// The member who paid (always the requesting user).
    pub paid_by: Uuid,
    /// What the expense was for.
    pub description: String,
    /// Total amount, in whole cents.
    pub amount: Decimal,
    /// Date the expense occurred.
    pub date: NaiveDate,
}

/// An expense with its computed splits.
#[derive(Debug, Clone)]
pub struct ExpenseWithSplits {
    /// The expense record.
    pub expense: expenses::Model,
    /// One share per group member at recording time.
    pub splits: Vec<expense_splits::Model>,
}

/// Expense repository for intake and listing.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an expense, split equally across the group's members.
    ///
    /// Members are resolved in join order (user id as tie-break), the same
    /// order the split engine hands out residual cents in, so the result is
    /// reproducible. The expense and all split rows are inserted in one
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::GroupNotFound` if the group does not exist,
    /// `ExpenseError::NotAMember` if the payer is not a current member,
    /// `ExpenseError::EmptyGroup` if the group has no members,
    /// `ExpenseError::Split` if the amount is invalid, or
    /// `ExpenseError::Database` if persistence fails. Nothing is written
    /// unless every check passes.
    pub async fn record(&self, input: NewExpense) -> Result<expenses::Model, ExpenseError> {
        let group = groups::Entity::find_by_id(input.group_id)
            .one(&self.db)
            .await?
            .ok_or(ExpenseError::GroupNotFound(input.group_id))?;

        let memberships = group_members::Entity::find()
            .filter(group_members::Column::GroupId.eq(group.id))
            .order_by_asc(group_members::Column::JoinedAt)
            .order_by_asc(group_members::Column::UserId)
            .all(&self.db)
            .await?;

        if memberships.is_empty() {
            return Err(ExpenseError::EmptyGroup);
        }
        if !memberships.iter().any(|m| m.user_id == input.paid_by) {
            return Err(ExpenseError::NotAMember);
        }

        let participants: Vec<UserId> = memberships
            .iter()
            .map(|m| UserId::from_uuid(m.user_id))
            .collect();
        let shares = split_equal(input.amount, &participants)?;

        let txn = self.db.begin().await?;

        let now = chrono::Utc::now().into();
        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            group_id: Set(group.id),
            description: Set(input.description),
            amount: Set(input.amount),
            paid_by: Set(input.paid_by),
            date: Set(input.date),
            split_type: Set(SplitType::Equal),
            created_at: Set(now),
        };
        let expense = expense.insert(&txn).await?;

        for share in shares {
            let split = expense_splits::ActiveModel {
                expense_id: Set(expense.id),
                user_id: Set(share.user_id.into_inner()),
                amount_owed: Set(share.amount_owed),
            };
            split.insert(&txn).await?;
        }

        txn.commit().await?;

        tracing::debug!(
            expense_id = %expense.id,
            group_id = %expense.group_id,
            members = memberships.len(),
            "Expense and splits committed"
        );

        Ok(expense)
    }

    /// Gets all expenses for a group, newest date first, with their splits.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_group(&self, group_id: Uuid) -> Result<Vec<ExpenseWithSplits>, DbErr> {
        expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group_id))
            .order_by_desc(expenses::Column::Date)
            .order_by_desc(expenses::Column::CreatedAt)
            .find_with_related(expense_splits::Entity)
            .all(&self.db)
            .await
            .map(|results| {
                results
                    .into_iter()
                    .map(|(expense, splits)| ExpenseWithSplits { expense, splits })
                    .collect()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping_follows_http_taxonomy() {
        assert_eq!(
            AppError::from(ExpenseError::GroupNotFound(Uuid::new_v4())).status_code(),
            404
        );
        assert_eq!(AppError::from(ExpenseError::NotAMember).status_code(), 403);
        assert_eq!(AppError::from(ExpenseError::EmptyGroup).status_code(), 422);
        assert_eq!(
            AppError::from(ExpenseError::Split(SplitError::InvalidAmount(
                Decimal::NEGATIVE_ONE
            )))
            .status_code(),
            400
        );
        assert_eq!(
            AppError::from(ExpenseError::Database(DbErr::Custom("boom".into()))).status_code(),
            500
        );
    }
}
