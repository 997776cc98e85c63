use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{DbError, PoolManager},
    enums::RegistrationStatus,
    models::Registration,
};

#[derive(Clone)]
pub struct RegistrationService {
    db: Arc<PoolManager>,
}

impl RegistrationService {
    pub fn new(db: Arc<PoolManager>) -> Self {
        Self { db }
    }

    /// Registers a user for an event in the `PENDING` state. Registering
    /// twice violates `registrations_event_id_user_id_key`.
    pub async fn register(&self, event_id: Uuid, user_id: Uuid) -> Result<Registration, DbError> {
        let mut conn = self.db.acquire().await?;
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (event_id, user_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&mut *conn)
        .await?;

        tracing::debug!(%event_id, %user_id, "registration created");
        Ok(registration)
    }

    pub async fn find(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<Registration>, DbError> {
        let mut conn = self.db.acquire().await?;
        let registration = sqlx::query_as::<_, Registration>(
            "SELECT * FROM registrations WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(registration)
    }

    pub async fn update_status(
        &self,
        id: Uuid,
        status: RegistrationStatus,
    ) -> Result<Option<Registration>, DbError> {
        let mut conn = self.db.acquire().await?;
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET status = $2, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(registration)
    }
}
