//! Models
//!
//! Data structures for user records, request/response bodies, and token claims.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

// ============================================
// Database Entities
// ============================================

/// User record as stored in the directory.
///
/// `email` is the login principal and is globally unique. Lookups compare it
/// case-sensitively, matching the unique index on the column.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a user. The hash must come from the credential
/// hasher, never a raw password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
}

/// Partial update of a user record. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
}

// ============================================
// Request DTOs
// ============================================

/// Registration request
///
/// Missing fields deserialize to empty strings so that absence and emptiness
/// fail validation the same way.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,

    pub name: Option<String>,
}

/// Profile update request; any subset of fields may be supplied
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "email must not be empty"))]
    pub email: Option<String>,

    pub name: Option<String>,

    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: Option<String>,
}

// ============================================
// Response DTOs
// ============================================

/// Public view of a user, safe to return from any endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Successful login response
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

// ============================================
// Token Claims
// ============================================

/// Identity carried inside a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Wire format of the signed claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject identity
    pub data: Identity,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}
