use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{DbError, PoolManager},
    models::{NewUser, User, UserFollow},
};

/// Emails are compared case-insensitively; this is the stored form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Clone)]
pub struct UserService {
    db: Arc<PoolManager>,
}

impl UserService {
    pub fn new(db: Arc<PoolManager>) -> Self {
        Self { db }
    }

    /// Looks a user up by email, ignoring case.
    ///
    /// Email is unique, so at most one row comes back. Should the
    /// constraint ever be broken the first row wins.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let email = normalize_email(email);
        let mut conn = self.db.acquire().await?;
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1 LIMIT 1")
            .bind(email)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DbError> {
        let mut conn = self.db.acquire().await?;
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(user)
    }

    /// Inserts a user with a normalized email. A taken email surfaces as
    /// a `users_email_key` constraint violation.
    pub async fn create(&self, new_user: NewUser) -> Result<User, DbError> {
        let NewUser {
            email,
            password_hash,
            first_name,
            last_name,
            role,
            city,
        } = new_user;

        let mut conn = self.db.acquire().await?;
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, role, city)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(normalize_email(&email))
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(role)
        .bind(city)
        .fetch_one(&mut *conn)
        .await?;

        tracing::debug!(user_id = %user.id, role = ?user.role, "user created");
        Ok(user)
    }

    /// Records that `follower_id` follows `following_id`. Following
    /// yourself is rejected by the `user_follows_check` constraint.
    pub async fn follow(&self, follower_id: Uuid, following_id: Uuid) -> Result<UserFollow, DbError> {
        let mut conn = self.db.acquire().await?;
        let follow = sqlx::query_as::<_, UserFollow>(
            r#"
            INSERT INTO user_follows (follower_id, following_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&mut *conn)
        .await?;
        Ok(follow)
    }

    /// Returns `false` if no user has that id.
    pub async fn record_login(&self, id: Uuid) -> Result<bool, DbError> {
        let mut conn = self.db.acquire().await?;
        let result = sqlx::query(
            r#"
            UPDATE users
            SET last_login_at = CURRENT_TIMESTAMP, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
