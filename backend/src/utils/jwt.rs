//! JWT token utilities for session authentication.
//!
//! Provides secure token creation, validation, and claims management. Tokens
//! are self-contained: validation checks only the signature and expiry, so no
//! database access is ever needed to authenticate a request.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::errors::ServiceError;

/// JWT Claims structure identifying the session's user
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// User email
    pub email: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token issued at timestamp
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    /// Check if token has expired
    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as usize;
        now > self.exp
    }
}

/// JWT token utility for creating and validating tokens
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expires_in_seconds: u64,
}

impl JwtUtils {
    /// Create a JwtUtils instance from loaded configuration
    pub fn from_config(config: &Config) -> Self {
        let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
            expires_in_seconds: config.jwt_expires_in_seconds,
        }
    }

    /// Create a new JwtUtils instance with keys from environment
    pub fn new() -> Result<Self, ServiceError> {
        let config = Config::from_env()
            .map_err(|e| ServiceError::configuration(format!("Config error: {}", e)))?;
        Ok(Self::from_config(&config))
    }

    /// Number of seconds a freshly minted token stays valid
    pub fn expires_in_seconds(&self) -> u64 {
        self.expires_in_seconds
    }

    /// Generate a new session token for the given user
    pub fn generate_token(&self, user_id: String, email: String) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.expires_in_seconds as i64);

        let claims = Claims {
            sub: user_id,
            email,
            exp: exp.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::internal_error(format!("Token generation failed: {}", e)))
    }

    /// Validate and decode a session token
    pub fn validate_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| ServiceError::unauthorized(format!("Token validation failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ServiceError;

    fn test_config(secret: &str) -> Config {
        Config {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            acquire_timeout_seconds: 3,
            jwt_secret: secret.to_string(),
            jwt_expires_in_seconds: 3600,
            server_port: 0,
            storage: None,
            gemini_api_key: None,
        }
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let jwt = JwtUtils::from_config(&test_config("round-trip-secret"));
        let token = jwt
            .generate_token("user-1".to_string(), "a@example.com".to_string())
            .unwrap();

        let claims = jwt.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@example.com");
        assert!(!claims.is_expired());
    }

    #[test]
    fn expired_token_is_rejected() {
        let jwt = JwtUtils::from_config(&test_config("expiry-secret"));

        // Forge a token whose exp is well past the default validation leeway.
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "user-1".to_string(),
            email: "a@example.com".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("expiry-secret".as_bytes()),
        )
        .unwrap();

        let err = jwt.validate_token(&token).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized { .. }));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let jwt = JwtUtils::from_config(&test_config("secret-a"));
        let other = JwtUtils::from_config(&test_config("secret-b"));

        let token = other
            .generate_token("user-1".to_string(), "a@example.com".to_string())
            .unwrap();

        let err = jwt.validate_token(&token).unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized { .. }));
    }
}
