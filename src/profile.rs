//! Profile Service
//!
//! Operations available to authenticated callers: list users, fetch by id,
//! and update the caller's own record. The record to mutate is always
//! resolved from the verified token identity, never from the request body.

use crate::error::ApiError;
use crate::models::{Identity, UpdateProfileRequest, User, UserPatch};
use crate::password::CredentialHasher;
use crate::store::UserStore;

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Authenticated user operations
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn UserStore>,
    hasher: CredentialHasher,
}

impl ProfileService {
    pub fn new(store: Arc<dyn UserStore>, hasher: CredentialHasher) -> Self {
        Self { store, hasher }
    }

    /// All users; callers serialize through `PublicUser` so the hash never leaves
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.store.list().await
    }

    /// Fetch a user by its id string.
    ///
    /// An id that does not parse names no record, so it reports the same
    /// `NotFound` as an absent id.
    pub async fn get(&self, id: &str) -> Result<User, ApiError> {
        let not_found = || ApiError::NotFound("User not found".to_string());

        let id = Uuid::parse_str(id).map_err(|_| not_found())?;
        self.store.find_by_id(id).await?.ok_or_else(not_found)
    }

    /// Update the caller's own record. A supplied password is re-hashed
    /// before it reaches the store.
    pub async fn update_own(
        &self,
        identity: &Identity,
        req: UpdateProfileRequest,
    ) -> Result<User, ApiError> {
        req.validate()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;

        let user = self
            .store
            .find_by_email(&identity.email)
            .await?
            .ok_or_else(|| ApiError::Forbidden("User not found".to_string()))?;

        let password_hash = match req.password {
            Some(password) => Some(self.hash_blocking(password).await?),
            None => None,
        };

        self.store
            .update(
                user.id,
                UserPatch {
                    email: req.email,
                    name: req.name,
                    password_hash,
                },
            )
            .await
    }

    async fn hash_blocking(&self, password: String) -> Result<String, ApiError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|_| ApiError::Internal)?
    }
}
