//! Expense intake routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::AuthUser};
use divvy_core::split::SplitError;
use divvy_db::ExpenseRepository;
use divvy_db::repositories::{ExpenseError, NewExpense};
use divvy_shared::types::validate_amount;

/// Creates the expenses router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new().route("/groups/{group_id}/expenses", post(add_expense))
}

/// Request payload for recording an expense.
#[derive(Debug, Deserialize)]
pub struct AddExpenseRequest {
    /// What the expense was for.
    pub description: String,
    /// Total amount in whole cents (e.g. "10.00").
    pub amount: Decimal,
    /// Date the expense occurred.
    pub date: NaiveDate,
}

/// Validates an expense payload before touching the database.
fn validate_expense(payload: &AddExpenseRequest) -> Result<(), &'static str> {
    if payload.description.trim().is_empty() || payload.description.len() > 255 {
        return Err("Description must be between 1 and 255 characters");
    }
    if payload.amount <= Decimal::ZERO || !validate_amount(payload.amount) {
        return Err("Amount must be positive with at most two decimal places");
    }
    Ok(())
}

/// POST `/groups/{group_id}/expenses` - Record an expense, split equally.
///
/// The caller is always the payer. The split across current members is
/// computed and persisted atomically with the expense itself.
async fn add_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<uuid::Uuid>,
    Json(payload): Json<AddExpenseRequest>,
) -> impl IntoResponse {
    if let Err(message) = validate_expense(&payload) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": message
            })),
        )
            .into_response();
    }

    let expense_repo = ExpenseRepository::new((*state.db).clone());

    let result = expense_repo
        .record(NewExpense {
            group_id,
            paid_by: auth.user_id(),
            description: payload.description.trim().to_string(),
            amount: payload.amount,
            date: payload.date,
        })
        .await;

    match result {
        Ok(expense) => {
            info!(
                expense_id = %expense.id,
                group_id = %group_id,
                paid_by = %auth.user_id(),
                amount = %expense.amount,
                "Expense recorded and split equally"
            );
            (
                StatusCode::CREATED,
                Json(json!({
                    "id": expense.id,
                    "group_id": expense.group_id,
                    "description": expense.description,
                    "amount": expense.amount,
                    "paid_by": expense.paid_by,
                    "date": expense.date,
                    "split_type": "equal",
                    "created_at": expense.created_at
                })),
            )
                .into_response()
        }
        Err(ExpenseError::GroupNotFound(_)) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "Group not found"
            })),
        )
            .into_response(),
        Err(ExpenseError::NotAMember) => (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "not_a_member",
                "message": "You are not a member of this group and cannot add expenses"
            })),
        )
            .into_response(),
        Err(ExpenseError::EmptyGroup) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "empty_group",
                "message": "Cannot split an expense: the group has no members"
            })),
        )
            .into_response(),
        Err(ExpenseError::Split(SplitError::InvalidAmount(_))) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": "Amount must be positive with at most two decimal places"
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to record expense");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred recording the expense"
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn payload(description: &str, amount: Decimal) -> AddExpenseRequest {
        AddExpenseRequest {
            description: description.to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2026, 8, 30).unwrap(),
        }
    }

    #[test]
    fn test_validate_expense_accepts_good_input() {
        assert!(validate_expense(&payload("Dinner", dec!(10.00))).is_ok());
    }

    #[test]
    fn test_validate_expense_rejects_blank_description() {
        assert!(validate_expense(&payload("   ", dec!(10.00))).is_err());
    }

    #[test]
    fn test_validate_expense_rejects_zero_amount() {
        assert!(validate_expense(&payload("Dinner", dec!(0))).is_err());
    }

    #[test]
    fn test_validate_expense_rejects_sub_cent_amount() {
        assert!(validate_expense(&payload("Dinner", dec!(1.005))).is_err());
    }
}
