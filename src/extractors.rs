//! Request Extractors
//!
//! Axum extractors for the two credential shapes the service accepts:
//! a verified bearer token (protected routes) and Basic credentials
//! (the login exchange only).

use crate::error::ApiError;
use crate::models::Identity;
use crate::AppContext;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::sync::Arc;

/// Authenticated caller, extracted from a verified bearer token
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AppContext>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = Arc::<AppContext>::from_ref(state);

        let header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::invalid_token())?;

        let identity = ctx.tokens.verify(token)?;
        Ok(AuthUser(identity))
    }
}

/// Basic credentials decoded from `Authorization: Basic base64(email:password)`
#[derive(Debug, Clone)]
pub struct BasicCredentials {
    pub email: String,
    pub password: String,
}

impl BasicCredentials {
    fn parse(header: &str) -> Option<Self> {
        let encoded = header.strip_prefix("Basic ")?;
        let decoded = BASE64.decode(encoded.trim()).ok()?;
        let pair = String::from_utf8(decoded).ok()?;
        // Passwords may contain ':'; only the first separator counts
        let (email, password) = pair.split_once(':')?;

        Some(Self {
            email: email.to_string(),
            password: password.to_string(),
        })
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for BasicCredentials
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(BasicCredentials::parse)
            .ok_or_else(|| ApiError::Unauthorized("Basic credentials required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_header() {
        let header = format!("Basic {}", BASE64.encode("a@x.com:p1"));
        let creds = BasicCredentials::parse(&header).unwrap();
        assert_eq!(creds.email, "a@x.com");
        assert_eq!(creds.password, "p1");
    }

    #[test]
    fn password_may_contain_colons() {
        let header = format!("Basic {}", BASE64.encode("a@x.com:p:1:2"));
        let creds = BasicCredentials::parse(&header).unwrap();
        assert_eq!(creds.password, "p:1:2");
    }

    #[test]
    fn rejects_malformed_headers() {
        assert!(BasicCredentials::parse("Bearer abc").is_none());
        assert!(BasicCredentials::parse("Basic !!!not-base64!!!").is_none());

        let no_colon = format!("Basic {}", BASE64.encode("just-an-email"));
        assert!(BasicCredentials::parse(&no_colon).is_none());
    }
}
