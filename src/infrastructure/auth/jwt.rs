//! JWT session token generation and validation

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::user::{UserAccount, UserId};
use crate::domain::DomainError;

/// Identity carried inside a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
}

/// JWT claims structure: `{ user: { id }, iat, exp }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub user: SessionUser,
    /// Issued at timestamp (Unix epoch)
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
}

impl SessionClaims {
    /// Create new claims for an account
    pub fn new(user: &UserAccount, expiration_seconds: u64) -> Self {
        let iat = Utc::now().timestamp();
        let window = i64::try_from(expiration_seconds).unwrap_or(i64::MAX);

        Self {
            user: SessionUser { id: *user.id() },
            iat,
            exp: iat.saturating_add(window),
        }
    }

    /// Get user ID from claims
    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }
}

/// Default validity window, in seconds
pub const DEFAULT_EXPIRATION_SECONDS: u64 = 3_600_000;

/// Configuration for JWT service
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for signing tokens
    pub secret: String,
    /// Token expiration time in seconds
    pub expiration_seconds: u64,
}

impl JwtConfig {
    /// Create new JWT configuration
    pub fn new(secret: impl Into<String>, expiration_seconds: u64) -> Self {
        Self {
            secret: secret.into(),
            expiration_seconds,
        }
    }
}

/// Trait for JWT operations
pub trait JwtGenerator: Send + Sync + Debug {
    /// Generate a signed session token for an account
    fn generate(&self, user: &UserAccount) -> Result<String, DomainError>;

    /// Validate a session token and return the claims
    fn validate(&self, token: &str) -> Result<SessionClaims, DomainError>;
}

/// HS256 JWT service using a shared secret
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("expiration_seconds", &self.config.expiration_seconds)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Create a new JWT service with the given configuration
    ///
    /// Fails if the secret is empty.
    pub fn new(config: JwtConfig) -> Result<Self, DomainError> {
        if config.secret.is_empty() {
            return Err(DomainError::configuration("JWT secret must not be empty"));
        }

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
        })
    }
}

impl JwtGenerator for JwtService {
    fn generate(&self, user: &UserAccount) -> Result<String, DomainError> {
        let claims = SessionClaims::new(user, self.config.expiration_seconds);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to generate JWT: {}", e)))
    }

    fn validate(&self, token: &str) -> Result<SessionClaims, DomainError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| DomainError::validation(format!("Invalid JWT: {}", e)))?;

        Ok(token_data.claims)
    }
}
