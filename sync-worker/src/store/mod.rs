//! User persistence layer.
//!
//! The HTTP handlers talk to the datastore through the [`UserStore`]
//! trait so event dispatch can be exercised without Postgres. The
//! production implementation is [`PgUserStore`].

pub mod errors;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

pub use errors::StoreError;
pub use postgres::PgUserStore;

/// A synchronized user record.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    /// Provider-issued external identifier
    pub clerk_id: String,
    pub username: String,
    /// Assigned at creation, never revised by later events
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for inserting a new user record.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub clerk_id: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Fields overwritten by a `user.updated` event.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub username: String,
    pub avatar_url: Option<String>,
}

/// Persistence operations for synchronized users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user record. Uniqueness of the external identifier
    /// is enforced by the datastore.
    async fn create(&self, user: &NewUser) -> Result<User, StoreError>;

    /// Overwrite `username` and `avatar_url` on the record with the
    /// given external identifier.
    async fn update(&self, clerk_id: &str, update: &UserUpdate) -> Result<User, StoreError>;

    /// Delete the record with the given external identifier, returning
    /// whether a record existed.
    async fn delete(&self, clerk_id: &str) -> Result<bool, StoreError>;
}
