use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{DbError, PoolManager},
    models::{NewNotification, Notification},
};

const MAX_UNREAD_PAGE: i64 = 100;

#[derive(Clone)]
pub struct NotificationService {
    db: Arc<PoolManager>,
}

impl NotificationService {
    pub fn new(db: Arc<PoolManager>) -> Self {
        Self { db }
    }

    pub async fn create(&self, notification: NewNotification) -> Result<Notification, DbError> {
        let mut conn = self.db.acquire().await?;
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, type, title, message, event_id, data)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(notification.user_id)
        .bind(notification.kind)
        .bind(notification.title)
        .bind(notification.message)
        .bind(notification.event_id)
        .bind(notification.data)
        .fetch_one(&mut *conn)
        .await?;
        Ok(notification)
    }

    /// Newest first, at most `limit` rows (capped at 100).
    pub async fn list_unread(&self, user_id: Uuid, limit: i64) -> Result<Vec<Notification>, DbError> {
        let mut conn = self.db.acquire().await?;
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1 AND is_read = false
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit.clamp(1, MAX_UNREAD_PAGE))
        .fetch_all(&mut *conn)
        .await?;
        Ok(notifications)
    }

    /// Scoped to the owner so one user cannot clear another's inbox.
    /// Returns `false` if nothing changed.
    pub async fn mark_read(&self, id: Uuid, user_id: Uuid) -> Result<bool, DbError> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET is_read = true, read_at = CURRENT_TIMESTAMP
            WHERE id = $1 AND user_id = $2 AND is_read = false
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    pub async fn unread_count(&self, user_id: Uuid) -> Result<i64, DbError> {
        let mut conn = self.db.acquire().await?;
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(count)
    }
}
