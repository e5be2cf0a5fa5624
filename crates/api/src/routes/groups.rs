//! Group management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use crate::{AppState, middleware::AuthUser};
use divvy_db::repositories::GroupError;
use divvy_db::{ExpenseRepository, GroupRepository, UserRepository};

/// Creates the groups router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/groups", post(create_group))
        .route("/groups", get(list_groups))
        .route("/groups/{group_id}", get(group_detail))
        .route("/groups/{group_id}/members", post(add_member))
}

/// Request payload for creating a group.
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    /// Group name.
    pub name: String,
}

/// Request payload for adding a member by username.
#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    /// Username of the member to add.
    pub username: String,
}

/// POST /groups - Create a new group with the caller as first member.
async fn create_group(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateGroupRequest>,
) -> impl IntoResponse {
    let name = payload.name.trim();
    if name.is_empty() || name.len() > 100 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Group name must be between 1 and 100 characters"
            })),
        )
            .into_response();
    }

    let group_repo = GroupRepository::new((*state.db).clone());

    let group = match group_repo.create_with_creator(name, auth.user_id()).await {
        Ok(g) => g,
        Err(e) => {
            error!(error = %e, "Failed to create group");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred creating the group"
                })),
            )
                .into_response();
        }
    };

    info!(group_id = %group.id, creator_id = %auth.user_id(), "Group created");

    (
        StatusCode::CREATED,
        Json(json!({
            "id": group.id,
            "name": group.name,
            "created_by": group.created_by,
            "created_at": group.created_at
        })),
    )
        .into_response()
}

/// GET /groups - List groups where the caller is a member.
async fn list_groups(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let group_repo = GroupRepository::new((*state.db).clone());

    match group_repo.groups_for_user(auth.user_id()).await {
        Ok(groups) => {
            let groups: Vec<_> = groups
                .into_iter()
                .map(|g| {
                    json!({
                        "id": g.id,
                        "name": g.name,
                        "created_by": g.created_by,
                        "created_at": g.created_at
                    })
                })
                .collect();
            (StatusCode::OK, Json(json!({ "groups": groups }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list groups");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
    }
}

/// GET `/groups/{group_id}` - Group detail: members and expenses with splits.
async fn group_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<uuid::Uuid>,
) -> impl IntoResponse {
    let group_repo = GroupRepository::new((*state.db).clone());

    let group = match group_repo.find_by_id(group_id).await {
        Ok(Some(g)) => g,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "not_found",
                    "message": "Group not found"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error fetching group");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    };

    match group_repo.is_member(group_id, auth.user_id()).await {
        Ok(true) => {}
        Ok(false) => {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "forbidden",
                    "message": "You are not a member of this group"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error checking membership");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    }

    let members = match group_repo.members(group_id).await {
        Ok(m) => m,
        Err(e) => {
            error!(error = %e, "Database error fetching members");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    };

    let expense_repo = ExpenseRepository::new((*state.db).clone());
    let expenses = match expense_repo.list_for_group(group_id).await {
        Ok(e) => e,
        Err(e) => {
            error!(error = %e, "Database error fetching expenses");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    };

    let members: Vec<_> = members
        .into_iter()
        .map(|(user, membership)| {
            json!({
                "id": user.id,
                "username": user.username,
                "joined_at": membership.joined_at
            })
        })
        .collect();

    let expenses: Vec<_> = expenses
        .into_iter()
        .map(|e| {
            let splits: Vec<_> = e
                .splits
                .iter()
                .map(|s| json!({ "user_id": s.user_id, "amount_owed": s.amount_owed }))
                .collect();
            json!({
                "id": e.expense.id,
                "description": e.expense.description,
                "amount": e.expense.amount,
                "paid_by": e.expense.paid_by,
                "date": e.expense.date,
                "splits": splits
            })
        })
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "id": group.id,
            "name": group.name,
            "created_by": group.created_by,
            "created_at": group.created_at,
            "members": members,
            "expenses": expenses
        })),
    )
        .into_response()
}

/// POST `/groups/{group_id}/members` - Add a member by username (creator only).
async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(group_id): Path<uuid::Uuid>,
    Json(payload): Json<AddMemberRequest>,
) -> impl IntoResponse {
    let group_repo = GroupRepository::new((*state.db).clone());

    let group = match group_repo.find_by_id(group_id).await {
        Ok(Some(g)) => g,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "not_found",
                    "message": "Group not found"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error fetching group");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    };

    // Only the group's creator may add members.
    if group.created_by != auth.user_id() {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "Only the group creator can add members"
            })),
        )
            .into_response();
    }

    let user_repo = UserRepository::new((*state.db).clone());
    let target = match user_repo.find_by_username(&payload.username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "unknown_user",
                    "message": format!("User {} does not exist", payload.username)
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error resolving username");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred"
                })),
            )
                .into_response();
        }
    };

    match group_repo.add_member(group_id, target.id).await {
        Ok(membership) => {
            info!(
                group_id = %group_id,
                user_id = %target.id,
                added_by = %auth.user_id(),
                "Member added to group"
            );
            (
                StatusCode::CREATED,
                Json(json!({
                    "group_id": membership.group_id,
                    "user_id": membership.user_id,
                    "joined_at": membership.joined_at
                })),
            )
                .into_response()
        }
        Err(GroupError::AlreadyMember) => {
            warn!(group_id = %group_id, user_id = %target.id, "Duplicate membership attempt");
            (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "already_member",
                    "message": format!("User {} is already a member of this group", payload.username)
                })),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to add member");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "An error occurred adding the member"
                })),
            )
                .into_response()
        }
    }
}
