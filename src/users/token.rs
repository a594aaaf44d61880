// JWT token generation and validation service

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::users::error::AuthError;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32, // user_id
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token service for JWT operations
#[derive(Clone)]
pub struct TokenService {
    secret: String,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }

    /// Generate a signed HS256 token for the user
    pub fn generate_token(&self, user_id: i32, email: &str) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Validate a token's signature and expiry
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
            _ => AuthError::InvalidToken,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const WEEK: i64 = 604800;

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes", WEEK)
    }

    #[test]
    fn test_token_lifetime_matches_configuration() {
        let service = test_token_service();
        let token = service.generate_token(1, "test@example.com").unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, WEEK);
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(service.validate_token("").is_err());
        assert!(service.validate_token("not.a.token").is_err());
        assert!(service
            .validate_token("eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.invalid.signature")
            .is_err());
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret1", WEEK);
        let service2 = TokenService::new("secret2", WEEK);

        let token = service1.generate_token(1, "test@example.com").unwrap();

        assert!(service1.validate_token(&token).is_ok());
        assert!(matches!(service2.validate_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        // Past the default 60s leeway
        let service = TokenService::new("test_secret_key_for_testing_purposes", -600);
        let token = service.generate_token(1, "test@example.com").unwrap();

        assert!(matches!(service.validate_token(&token), Err(AuthError::ExpiredToken)));
    }

    proptest! {
        #[test]
        fn prop_token_claims_contain_identity(
            user_id in 1i32..1000000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_token_service();
            let token = service.generate_token(user_id, &email).unwrap();
            let claims = service.validate_token(&token).unwrap();

            prop_assert_eq!(claims.sub, user_id);
            prop_assert_eq!(claims.email, email);
        }

        #[test]
        fn prop_token_lifetime(ttl in 120i64..10_000_000) {
            let service = TokenService::new("test_secret_key_for_testing_purposes", ttl);
            let token = service.generate_token(7, "a@b.com").unwrap();
            let claims = service.validate_token(&token).unwrap();

            prop_assert_eq!(claims.exp - claims.iat, ttl);
        }

        #[test]
        fn prop_malformed_tokens_rejected(malformed in "[a-zA-Z0-9]{10,50}") {
            let service = test_token_service();
            prop_assert!(service.validate_token(&malformed).is_err());
        }
    }
}
