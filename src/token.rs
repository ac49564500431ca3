//! Token Service
//!
//! Issues and verifies signed, time-limited bearer tokens. Tokens are JWTs
//! signed with a shared secret (HMAC-SHA256) carrying the identity claims
//! `{data: {id, name, email}, iat, exp}` with `exp = iat + ttl`.

use crate::error::ApiError;
use crate::models::{Identity, TokenClaims};

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Token issuance and verification
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: i64,
}

impl TokenService {
    /// Create a token service from the shared secret and a ttl in seconds
    pub fn new(secret: &str, ttl: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Token time-to-live in seconds
    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    /// Issue a token for the given identity, valid from now until now + ttl
    pub fn issue(&self, identity: Identity) -> Result<String, ApiError> {
        let iat = Utc::now().timestamp();
        let claims = TokenClaims {
            data: identity,
            iat,
            exp: iat + self.ttl,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Verify signature and expiry, returning the embedded identity.
    ///
    /// Every failure mode (bad signature, malformed token, expired) collapses
    /// into the same `Unauthorized` outcome.
    pub fn verify(&self, token: &str) -> Result<Identity, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| ApiError::invalid_token())?;

        Ok(data.claims.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn identity() -> Identity {
        Identity {
            id: Uuid::new_v4(),
            name: Some("testuser".to_string()),
            email: "testuser@mail.com".to_string(),
        }
    }

    #[test]
    fn issued_token_verifies_immediately() {
        let svc = TokenService::new(SECRET, 3600);
        let who = identity();

        let token = svc.issue(who.clone()).unwrap();
        assert!(!token.is_empty());

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims, who);
    }

    #[test]
    fn expiry_is_issue_time_plus_ttl() {
        let svc = TokenService::new(SECRET, 3600);
        let token = svc.issue(identity()).unwrap();

        // Inspect raw claims without expiry enforcement
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data = decode::<TokenClaims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &validation,
        )
        .unwrap();

        assert_eq!(data.claims.exp, data.claims.iat + 3600);
        assert!(data.claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = TokenService::new(SECRET, 3600);

        let iat = Utc::now().timestamp() - 7200;
        let claims = TokenClaims {
            data: identity(),
            iat,
            exp: iat + 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = TokenService::new(SECRET, 3600);
        let token = svc.issue(identity()).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        assert!(svc.verify(&tampered).is_err());
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let svc = TokenService::new(SECRET, 3600);
        let other = TokenService::new("ffffffffffffffffffffffffffffffff", 3600);

        let token = other.issue(identity()).unwrap();
        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let svc = TokenService::new(SECRET, 3600);
        assert!(svc.verify("not.a.token").is_err());
        assert!(svc.verify("").is_err());
    }
}
