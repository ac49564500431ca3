//! Auth Gateway
//!
//! Orchestrates registration and login: validates input shape, drives the
//! credential hasher and user directory, and issues bearer tokens.

use crate::error::ApiError;
use crate::models::{Identity, NewUser, RegisterRequest, User};
use crate::password::CredentialHasher;
use crate::store::UserStore;
use crate::token::TokenService;

use std::sync::Arc;
use validator::Validate;

/// Registration and login logic
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: CredentialHasher,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, hasher: CredentialHasher, tokens: TokenService) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Register a new user.
    ///
    /// The pre-check gives a friendly conflict for the common case; the
    /// store's unique constraint is what actually guarantees one user per
    /// email under concurrent registration.
    pub async fn register(&self, req: RegisterRequest) -> Result<User, ApiError> {
        req.validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        if self.store.find_by_email(&req.email).await?.is_some() {
            return Err(ApiError::Conflict("User already exists".to_string()));
        }

        let password_hash = self.hash_blocking(req.password).await?;

        let user = self
            .store
            .create(NewUser {
                email: req.email,
                name: req.name,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Authenticate Basic credentials and mint a bearer token.
    ///
    /// "Bad email" and "Bad password" are deliberately distinguishable; this
    /// is the service's documented contract.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Bad email".to_string()))?;

        if !self.verify_blocking(password.to_string(), user.password_hash.clone()).await? {
            return Err(ApiError::Unauthorized("Bad password".to_string()));
        }

        let token = self.tokens.issue(Identity::from(&user))?;
        tracing::debug!(user_id = %user.id, "login succeeded");
        Ok(token)
    }

    /// Run the cost-factored hash on the blocking pool
    async fn hash_blocking(&self, password: String) -> Result<String, ApiError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|_| ApiError::Internal)?
    }

    async fn verify_blocking(&self, password: String, digest: String) -> Result<bool, ApiError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|_| ApiError::Internal)
    }
}
