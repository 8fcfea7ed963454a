//! Notification repository.
//!
//! Notifications are written after the ledger unit of work has committed.
//! Delivery is someone else's job: a transport lists unsent notifications
//! and marks them sent; the member acknowledges them later.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use sea_orm::sea_query::Expr;
use strequelistan_core::notification::{NewNotification, NotificationKind};
use strequelistan_shared::types::{AccountId, NotificationId};

use crate::entities::notifications;

/// Inserts a notification on any connection or transaction.
pub(crate) async fn insert<C: ConnectionTrait>(
    conn: &C,
    notification: NewNotification,
) -> Result<notifications::Model, DbErr> {
    notifications::ActiveModel {
        id: Set(NotificationId::new().into_inner()),
        account_id: Set(notification.account_id.into_inner()),
        text: Set(notification.text),
        kind: Set(notification.kind.into()),
        reference: Set(notification.reference),
        is_sent: Set(false),
        is_acknowledged: Set(false),
        timestamp: Set(Utc::now()),
    }
    .insert(conn)
    .await
}

/// Deletes the unsent notification of `kind` that refers to `reference`.
///
/// Returns true if one was removed.
pub(crate) async fn retract_unsent<C: ConnectionTrait>(
    conn: &C,
    account_id: AccountId,
    kind: NotificationKind,
    reference: &str,
) -> Result<bool, DbErr> {
    let kind: crate::entities::sea_orm_active_enums::NotificationKind = kind.into();
    let result = notifications::Entity::delete_many()
        .filter(notifications::Column::AccountId.eq(account_id.into_inner()))
        .filter(notifications::Column::Kind.eq(kind))
        .filter(notifications::Column::Reference.eq(reference))
        .filter(notifications::Column::IsSent.eq(false))
        .exec(conn)
        .await?;
    Ok(result.rows_affected > 0)
}

/// Notification repository.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores a notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, notification: NewNotification) -> Result<notifications::Model, DbErr> {
        insert(&self.db, notification).await
    }

    /// Lists notifications not yet handed to a transport, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_unsent(&self, account_id: AccountId) -> Result<Vec<notifications::Model>, DbErr> {
        notifications::Entity::find()
            .filter(notifications::Column::AccountId.eq(account_id.into_inner()))
            .filter(notifications::Column::IsSent.eq(false))
            .order_by_asc(notifications::Column::Timestamp)
            .order_by_asc(notifications::Column::Id)
            .all(&self.db)
            .await
    }

    /// Lists notifications the member has not acknowledged, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_unacknowledged(
        &self,
        account_id: AccountId,
    ) -> Result<Vec<notifications::Model>, DbErr> {
        notifications::Entity::find()
            .filter(notifications::Column::AccountId.eq(account_id.into_inner()))
            .filter(notifications::Column::IsAcknowledged.eq(false))
            .order_by_desc(notifications::Column::Timestamp)
            .order_by_desc(notifications::Column::Id)
            .all(&self.db)
            .await
    }

    /// Marks the given notifications as sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn mark_sent(&self, ids: &[NotificationId]) -> Result<u64, DbErr> {
        if ids.is_empty() {
            return Ok(0);
        }
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsSent, Expr::value(true))
            .filter(notifications::Column::Id.is_in(ids.iter().map(|id| id.into_inner())))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// Acknowledges every sent notification of an account.
    ///
    /// Unsent notifications stay pending so they are not lost.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn acknowledge_all(&self, account_id: AccountId) -> Result<u64, DbErr> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsAcknowledged, Expr::value(true))
            .filter(notifications::Column::AccountId.eq(account_id.into_inner()))
            .filter(notifications::Column::IsSent.eq(true))
            .filter(notifications::Column::IsAcknowledged.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
