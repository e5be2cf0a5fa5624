//! Group repository for database operations.
//!
//! Covers group creation (with the creator's automatic membership),
//! membership management, and member listing in a stable order.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{group_members, groups, users};

/// Error types for group operations.
#[derive(Debug, thiserror::Error)]
pub enum GroupError {
    /// User is already a member of the group.
    #[error("User is already a member of this group")]
    AlreadyMember,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Group repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct GroupRepository {
    db: DatabaseConnection,
}

impl GroupRepository {
    /// Creates a new group repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a group by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<groups::Model>, DbErr> {
        groups::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new group with the creator as its first member.
    ///
    /// The group insert and the creator's membership insert are one
    /// transaction: a group never exists without its creator as member.
    ///
    /// # Errors
    ///
    /// Returns an error if the database writes fail.
    pub async fn create_with_creator(
        &self,
        name: &str,
        creator_id: Uuid,
    ) -> Result<groups::Model, DbErr> {
        let txn = self.db.begin().await?;

        let now = chrono::Utc::now().into();

        let group = groups::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            created_by: Set(creator_id),
            created_at: Set(now),
        };
        let group = group.insert(&txn).await?;

        let membership = group_members::ActiveModel {
            user_id: Set(creator_id),
            group_id: Set(group.id),
            joined_at: Set(now),
        };
        membership.insert(&txn).await?;

        txn.commit().await?;

        Ok(group)
    }

    /// Adds a user to a group.
    ///
    /// The composite primary key on (user_id, group_id) is the duplicate
    /// guard: two concurrent inserts for the same pair cannot both succeed,
    /// and the loser surfaces as `GroupError::AlreadyMember`.
    ///
    /// # Errors
    ///
    /// Returns `GroupError::AlreadyMember` for duplicates, or
    /// `GroupError::Database` for other failures.
    pub async fn add_member(
        &self,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<group_members::Model, GroupError> {
        let membership = group_members::ActiveModel {
            user_id: Set(user_id),
            group_id: Set(group_id),
            joined_at: Set(chrono::Utc::now().into()),
        };

        membership
            .insert(&self.db)
            .await
            .map_err(|e| match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => GroupError::AlreadyMember,
                _ => GroupError::Database(e),
            })
    }

    /// Checks if a user is a member of a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn is_member(&self, group_id: Uuid, user_id: Uuid) -> Result<bool, DbErr> {
        let count = group_members::Entity::find()
            .filter(group_members::Column::GroupId.eq(group_id))
            .filter(group_members::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    /// Gets all members of a group, in join order (user id as tie-break).
    ///
    /// Split computation consumes this list, so the order must be stable
    /// for shares to be reproducible.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn members(
        &self,
        group_id: Uuid,
    ) -> Result<Vec<(users::Model, group_members::Model)>, DbErr> {
        group_members::Entity::find()
            .filter(group_members::Column::GroupId.eq(group_id))
            .order_by_asc(group_members::Column::JoinedAt)
            .order_by_asc(group_members::Column::UserId)
            .find_also_related(users::Entity)
            .all(&self.db)
            .await
            .map(|results| {
                results
                    .into_iter()
                    .filter_map(|(gm, user)| user.map(|u| (u, gm)))
                    .collect()
            })
    }

    /// Gets all groups where the user is a member.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn groups_for_user(&self, user_id: Uuid) -> Result<Vec<groups::Model>, DbErr> {
        group_members::Entity::find()
            .filter(group_members::Column::UserId.eq(user_id))
            .order_by_asc(group_members::Column::JoinedAt)
            .find_also_related(groups::Entity)
            .all(&self.db)
            .await
            .map(|results| {
                results
                    .into_iter()
                    .filter_map(|(_, group)| group)
                    .collect()
            })
    }
}
