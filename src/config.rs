//! Service Configuration
//!
//! All configuration values are loaded from environment variables.
//! The token signing secret has no default and must be provided.

use crate::error::ApiError;
use std::env;

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string (from DATABASE_URL env var)
    pub database_url: String,

    /// Listen address (from BIND_ADDR env var)
    pub bind_addr: String,

    /// Secret key for signing bearer tokens (from JWT_SECRET env var)
    pub jwt_secret: String,

    /// Bearer token time-to-live in seconds (from TOKEN_TTL env var)
    pub token_ttl: i64,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost, iterations (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Panics
    /// Panics if JWT_SECRET environment variable is not set
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost/userbase".to_string()),

            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),

            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET environment variable must be set"),

            token_ttl: env::var("TOKEN_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600), // 1 hour default

            argon2_memory_cost: env::var("ARGON2_MEMORY_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(65536), // 64 MiB

            argon2_time_cost: env::var("ARGON2_TIME_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3),

            argon2_parallelism: env::var("ARGON2_PARALLELISM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(4),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.jwt_secret.len() < 32 {
            return Err(ApiError::Config(
                "JWT_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.token_ttl <= 0 {
            return Err(ApiError::Config("TOKEN_TTL must be positive".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AppConfig {
        AppConfig {
            database_url: "postgres://localhost/test".to_string(),
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: "a".repeat(32),
            token_ttl: 3600,
            argon2_memory_cost: 8,
            argon2_time_cost: 1,
            argon2_parallelism: 1,
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_short_secret() {
        let config = AppConfig {
            jwt_secret: "short".to_string(),
            ..test_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_nonpositive_ttl() {
        let config = AppConfig {
            token_ttl: 0,
            ..test_config()
        };
        assert!(config.validate().is_err());
    }
}
