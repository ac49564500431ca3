//! User Directory
//!
//! Canonical user record store. Business logic depends on the `UserStore`
//! trait; `PgUserStore` is the production Postgres implementation and
//! `MemoryUserStore` backs the test suite.
//!
//! Email uniqueness is enforced at the storage layer (unique column
//! constraint in Postgres, single write-lock section in memory), so two
//! concurrent registrations with the same email cannot both succeed.

use crate::error::ApiError;
use crate::models::{NewUser, User, UserPatch};

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

const DUPLICATE_EMAIL: &str = "User already exists";

/// Storage operations for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by email (case-sensitive, matching the unique index)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError>;

    /// Look up a user by id
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError>;

    /// Create a user; fails with `Conflict` if the email is taken
    async fn create(&self, new: NewUser) -> Result<User, ApiError>;

    /// Apply a partial update; `None` fields are left untouched
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, ApiError>;

    /// All users, unordered
    async fn list(&self) -> Result<Vec<User>, ApiError>;
}

// ============================================
// Postgres Store
// ============================================

/// Postgres-backed user store
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the users table and its unique email constraint
    pub async fn migrate(&self) -> Result<(), ApiError> {
        tracing::info!("Running user store migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                email VARCHAR(255) NOT NULL UNIQUE,
                name VARCHAR(100),
                password_hash VARCHAR(255) NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users(email);")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let user = sqlx::query_as("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, new: NewUser) -> Result<User, ApiError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            // The unique constraint closes the race between a prior
            // existence check and this insert.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(ApiError::Conflict(DUPLICATE_EMAIL.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, ApiError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                email = COALESCE($1, email),
                name = COALESCE($2, name),
                password_hash = COALESCE($3, password_hash),
                updated_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&patch.email)
        .bind(&patch.name)
        .bind(&patch.password_hash)
        .bind(id)
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(ApiError::NotFound("User not found".to_string())),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(ApiError::Conflict(DUPLICATE_EMAIL.to_string()))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn list(&self) -> Result<Vec<User>, ApiError> {
        let users = sqlx::query_as("SELECT * FROM users")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}

// ============================================
// In-Memory Store
// ============================================

/// In-memory user store standing in for the external document store in tests
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, ApiError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, new: NewUser) -> Result<User, ApiError> {
        // Uniqueness check and insert happen under one write lock
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new.email) {
            return Err(ApiError::Conflict(DUPLICATE_EMAIL.to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            name: new.name,
            password_hash: new.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, ApiError> {
        let mut users = self.users.write().await;

        if let Some(email) = &patch.email {
            if users.values().any(|u| u.id != id && &u.email == email) {
                return Err(ApiError::Conflict(DUPLICATE_EMAIL.to_string()));
            }
        }

        let user = users
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(name) = patch.name {
            user.name = Some(name);
        }
        if let Some(hash) = patch.password_hash {
            user.password_hash = hash;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn list(&self) -> Result<Vec<User>, ApiError> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            name: Some("testuser".to_string()),
            password_hash: "$argon2id$fake".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_find() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("a@x.com")).await.unwrap();

        let by_email = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);

        let by_id = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(new_user("a@x.com")).await.unwrap();

        let err = store.create(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let store = MemoryUserStore::new();
        store.create(new_user("a@x.com")).await.unwrap();

        assert!(store.find_by_email("A@X.COM").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn patch_touches_only_supplied_fields() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("a@x.com")).await.unwrap();

        let updated = store
            .update(
                user.id,
                UserPatch {
                    email: Some("b@x.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "b@x.com");
        assert_eq!(updated.name, user.name);
        assert_eq!(updated.password_hash, user.password_hash);
        assert_eq!(updated.id, user.id);
    }

    #[tokio::test]
    async fn patch_to_taken_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(new_user("a@x.com")).await.unwrap();
        let other = store.create(new_user("b@x.com")).await.unwrap();

        let err = store
            .update(
                other.id,
                UserPatch {
                    email: Some("a@x.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_missing_user_is_not_found() {
        let store = MemoryUserStore::new();
        let err = store
            .update(Uuid::new_v4(), UserPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_returns_everyone() {
        let store = MemoryUserStore::new();
        store.create(new_user("a@x.com")).await.unwrap();
        store.create(new_user("b@x.com")).await.unwrap();

        assert_eq!(store.list().await.unwrap().len(), 2);
    }
}
