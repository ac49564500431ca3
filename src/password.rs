//! Credential Hasher
//!
//! One-way password hashing and verification using Argon2id. The salt is
//! embedded in the digest; verification is constant-time inside argon2.

use crate::error::ApiError;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};

/// Password hasher with configurable cost parameters
#[derive(Debug, Clone)]
pub struct CredentialHasher {
    memory_cost: u32,
    time_cost: u32,
    parallelism: u32,
}

impl CredentialHasher {
    pub fn new(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            memory_cost,
            time_cost,
            parallelism,
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>, ApiError> {
        let params = Params::new(self.memory_cost, self.time_cost, self.parallelism, None)
            .map_err(|_| ApiError::Internal)?;
        Ok(Argon2::new(
            argon2::Algorithm::Argon2id,
            argon2::Version::V0x13,
            params,
        ))
    }

    /// Hash a password. The only input error is an empty password.
    pub fn hash(&self, password: &str) -> Result<String, ApiError> {
        if password.is_empty() {
            return Err(ApiError::BadRequest("password must not be empty".to_string()));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()?
            .hash_password(password.as_bytes(), &salt)?
            .to_string();

        Ok(hash)
    }

    /// Verify a password against a stored digest.
    ///
    /// A malformed digest yields `false` rather than an error so that callers
    /// treat it exactly like a wrong password.
    pub fn verify(&self, password: &str, digest: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(digest) else {
            return false;
        };
        let Ok(argon2) = self.argon2() else {
            return false;
        };

        argon2.verify_password(password.as_bytes(), &parsed).is_ok()
    }
}
