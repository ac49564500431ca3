//! userbase - minimal user-account service
//!
//! Provides:
//! - User registration with Argon2id password hashing
//! - Login via Basic credentials, returning a signed bearer token
//! - Token-protected profile API: list users, fetch by id, update own record
//!
//! # Configuration
//!
//! All configuration is loaded from environment variables:
//! - `JWT_SECRET` - Secret key for signing tokens (required, min 32 chars)
//! - `TOKEN_TTL` - Token time-to-live in seconds (default: 3600)
//! - `DATABASE_URL` - Postgres connection string
//! - `BIND_ADDR` - Listen address (default: "0.0.0.0:3000")
//! - `ARGON2_MEMORY_COST` / `ARGON2_TIME_COST` / `ARGON2_PARALLELISM`
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use userbase::{create_router, AppConfig, AppContext, PgUserStore};
//!
//! let config = AppConfig::from_env();
//! let store = Arc::new(PgUserStore::new(pool));
//! let ctx = Arc::new(AppContext::new(store, &config));
//! let app = create_router(ctx);
//! ```

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod password;
pub mod profile;
pub mod service;
pub mod store;
pub mod token;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::ApiError;
pub use extractors::{AuthUser, BasicCredentials};
pub use handlers::create_router;
pub use models::*;
pub use password::CredentialHasher;
pub use profile::ProfileService;
pub use service::AuthService;
pub use store::{MemoryUserStore, PgUserStore, UserStore};
pub use token::TokenService;

use std::sync::Arc;

/// Application context constructed once at startup and shared by every
/// handler. Replaces any ambient global state.
pub struct AppContext {
    pub auth: AuthService,
    pub profile: ProfileService,
    pub tokens: TokenService,
}

impl AppContext {
    pub fn new(store: Arc<dyn UserStore>, config: &AppConfig) -> Self {
        let hasher = CredentialHasher::new(
            config.argon2_memory_cost,
            config.argon2_time_cost,
            config.argon2_parallelism,
        );
        let tokens = TokenService::new(&config.jwt_secret, config.token_ttl);

        Self {
            auth: AuthService::new(store.clone(), hasher.clone(), tokens.clone()),
            profile: ProfileService::new(store, hasher),
            tokens,
        }
    }
}
