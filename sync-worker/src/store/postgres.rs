//! Postgres-backed user store.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::errors::StoreError;
use super::{NewUser, User, UserStore, UserUpdate};

/// [`UserStore`] implementation backed by a shared [`PgPool`].
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self, user), fields(clerk_id = %user.clerk_id), err)]
    async fn create(&self, user: &NewUser) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (clerk_id, username, display_name, avatar_url)
            VALUES ($1, $2, $3, $4)
            RETURNING clerk_id, username, display_name, avatar_url, created_at, updated_at
            "#,
        )
        .bind(&user.clerk_id)
        .bind(&user.username)
        .bind(&user.display_name)
        .bind(&user.avatar_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    #[instrument(skip(self, update), err)]
    async fn update(&self, clerk_id: &str, update: &UserUpdate) -> Result<User, StoreError> {
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2, avatar_url = $3, updated_at = NOW()
            WHERE clerk_id = $1
            RETURNING clerk_id, username, display_name, avatar_url, created_at, updated_at
            "#,
        )
        .bind(clerk_id)
        .bind(&update.username)
        .bind(&update.avatar_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)?;

        Ok(updated)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, clerk_id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE clerk_id = $1")
            .bind(clerk_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
