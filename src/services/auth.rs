//! Authentication service: JWT token pairs and password checks
//!
//! Issues short-lived access tokens and long-lived refresh tokens (HS256).
//! Refresh tokens are stored server-side as SHA-256 hashes so they can be
//! rotated and revoked; persistence of those hashes is the caller's job,
//! keeping this service free of database access.

use anyhow::{Result, anyhow};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Claims structure for access tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// User ID (subject)
    pub sub: String,
    /// Username
    pub username: String,
    /// Token type
    pub token_type: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Claims structure for refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshTokenClaims {
    /// User ID (subject)
    pub sub: String,
    /// Token type
    pub token_type: String,
    /// Unique token ID (for revocation)
    pub jti: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Issued at timestamp
    pub iat: i64,
}

/// Token pair returned after successful authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    /// Short-lived access token
    pub access_token: String,
    /// Long-lived refresh token
    pub refresh_token: String,
    /// Access token expiration in seconds
    pub expires_in: i64,
    /// Token type (always "Bearer")
    pub token_type: String,
}

/// A freshly generated pair plus what the caller must persist
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub tokens: AuthTokens,
    pub refresh_token_hash: String,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Auth service configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    pub access_token_lifetime: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_lifetime: i64,
}

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Hash a password with bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        hash(password, DEFAULT_COST).map_err(|e| anyhow!("Failed to hash password: {}", e))
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        verify(password, hash).map_err(|e| anyhow!("Failed to verify password: {}", e))
    }

    /// Hash a token for storage (using SHA-256)
    pub fn hash_token(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Generate an access/refresh token pair for a user
    pub fn generate_tokens(&self, user_id: i64, username: &str) -> Result<IssuedTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.config.access_token_lifetime);
        let refresh_exp = now + Duration::seconds(self.config.refresh_token_lifetime);

        let access_claims = AccessTokenClaims {
            sub: user_id.to_string(),
            username: username.to_string(),
            token_type: "access".to_string(),
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::new(Algorithm::HS256),
            &access_claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| anyhow!("Failed to create access token: {}", e))?;

        let refresh_claims = RefreshTokenClaims {
            sub: user_id.to_string(),
            token_type: "refresh".to_string(),
            jti: Uuid::new_v4().to_string(),
            exp: refresh_exp.timestamp(),
            iat: now.timestamp(),
        };

        let refresh_token = encode(
            &Header::new(Algorithm::HS256),
            &refresh_claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| anyhow!("Failed to create refresh token: {}", e))?;

        let refresh_token_hash = self.hash_token(&refresh_token);

        Ok(IssuedTokens {
            tokens: AuthTokens {
                access_token,
                refresh_token,
                expires_in: self.config.access_token_lifetime,
                token_type: "Bearer".to_string(),
            },
            refresh_token_hash,
            refresh_expires_at: refresh_exp,
        })
    }

    /// Decode and validate an access token
    pub fn validate_access_token(&self, token: &str) -> Result<AccessTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| anyhow!("Invalid access token: {}", e))?;

        if token_data.claims.token_type != "access" {
            return Err(anyhow!("Invalid token type"));
        }

        Ok(token_data.claims)
    }

    /// Decode and validate a refresh token
    pub fn decode_refresh_token(&self, token: &str) -> Result<RefreshTokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<RefreshTokenClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| anyhow!("Invalid refresh token: {}", e))?;

        if token_data.claims.token_type != "refresh" {
            return Err(anyhow!("Invalid token type"));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> AuthService {
        AuthService::new(AuthConfig {
            jwt_secret: "test-secret".to_string(),
            access_token_lifetime: 900,
            refresh_token_lifetime: 3600,
        })
    }

    #[test]
    fn access_token_round_trips() {
        let service = test_service();
        let issued = service.generate_tokens(42, "alice").unwrap();

        let claims = service
            .validate_access_token(&issued.tokens.access_token)
            .unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let service = test_service();
        let issued = service.generate_tokens(42, "alice").unwrap();

        assert!(
            service
                .validate_access_token(&issued.tokens.refresh_token)
                .is_err()
        );
        assert!(
            service
                .decode_refresh_token(&issued.tokens.access_token)
                .is_err()
        );
    }

    #[test]
    fn refresh_token_decodes_with_jti() {
        let service = test_service();
        let issued = service.generate_tokens(7, "bob").unwrap();

        let claims = service
            .decode_refresh_token(&issued.tokens.refresh_token)
            .unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.token_type, "refresh");
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn expired_access_token_is_rejected() {
        let service = AuthService::new(AuthConfig {
            jwt_secret: "test-secret".to_string(),
            access_token_lifetime: -120,
            refresh_token_lifetime: 3600,
        });
        let issued = service.generate_tokens(1, "carol").unwrap();

        assert!(
            service
                .validate_access_token(&issued.tokens.access_token)
                .is_err()
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issued = test_service().generate_tokens(1, "dave").unwrap();

        let other = AuthService::new(AuthConfig {
            jwt_secret: "another-secret".to_string(),
            access_token_lifetime: 900,
            refresh_token_lifetime: 3600,
        });
        assert!(
            other
                .validate_access_token(&issued.tokens.access_token)
                .is_err()
        );
    }

    #[test]
    fn token_hash_is_stable_hex() {
        let service = test_service();
        let a = service.hash_token("some-token");
        let b = service.hash_token("some-token");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, service.hash_token("other-token"));
    }

    #[test]
    fn password_verification() {
        let service = test_service();
        let hash = bcrypt::hash("hunter2", 4).unwrap();
        assert!(service.verify_password("hunter2", &hash).unwrap());
        assert!(!service.verify_password("hunter3", &hash).unwrap());
    }
}
