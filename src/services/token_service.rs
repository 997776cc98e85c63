use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::{DbError, PoolManager},
    models::{NewToken, Token},
};

#[derive(Clone)]
pub struct TokenService {
    db: Arc<PoolManager>,
}

impl TokenService {
    pub fn new(db: Arc<PoolManager>) -> Self {
        Self { db }
    }

    pub async fn create(&self, token: NewToken) -> Result<Token, DbError> {
        let mut conn = self.db.acquire().await?;
        let token = sqlx::query_as::<_, Token>(
            r#"
            INSERT INTO tokens (user_id, token_hash, type, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(token.user_id)
        .bind(token.token_hash)
        .bind(token.kind)
        .bind(token.expires_at)
        .fetch_one(&mut *conn)
        .await?;
        Ok(token)
    }

    /// Finds a token that has neither expired nor been used.
    pub async fn find_active_by_hash(&self, token_hash: &str) -> Result<Option<Token>, DbError> {
        let mut conn = self.db.acquire().await?;
        let token = sqlx::query_as::<_, Token>(
            r#"
            SELECT * FROM tokens
            WHERE token_hash = $1 AND used_at IS NULL AND expires_at > $2
            "#,
        )
        .bind(token_hash)
        .bind(Utc::now().naive_utc())
        .fetch_optional(&mut *conn)
        .await?;
        Ok(token)
    }

    /// Returns `false` if the token does not exist or was already used.
    pub async fn mark_used(&self, id: Uuid) -> Result<bool, DbError> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query("UPDATE tokens SET used_at = $2 WHERE id = $1 AND used_at IS NULL")
            .bind(id)
            .bind(Utc::now().naive_utc())
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() == 1)
    }
}
