//! User store
//!
//! The credential workflow only depends on [`UserDataSource`]. Production
//! uses [`PgUserDataSource`]; tests and local runs can swap in
//! [`InMemoryUserDataSource`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Stored user record
///
/// Holds the salted hash and its salt. The raw password is never stored.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub salt: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: String, salt: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            password_hash,
            salt,
            created_at: Utc::now(),
        }
    }
}

/// User store failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Username already exists")]
    DuplicateUsername,

    #[error("User store unavailable")]
    Unavailable(#[from] sqlx::Error),
}

/// Persistent user collection keyed by username
#[async_trait]
pub trait UserDataSource: Send + Sync {
    /// Look up a user by exact username
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Insert a new user; fails with `DuplicateUsername` if the name is taken
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// PostgreSQL-backed user store
#[derive(Clone)]
pub struct PgUserDataSource {
    pool: PgPool,
}

impl PgUserDataSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDataSource for PgUserDataSource {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, salt, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, salt, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.salt)
        .bind(user.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::DuplicateUsername)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// In-memory user store
#[derive(Default)]
pub struct InMemoryUserDataSource {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserDataSource for InMemoryUserDataSource {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(StoreError::DuplicateUsername);
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }
}
