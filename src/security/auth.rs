//! Authentication Module
//!
//! Provides JWT (JSON Web Token) bearer authentication. Every validation
//! failure (bad structure, bad signature, expiry, issuer mismatch) maps to
//! one uniform `Unauthorized` so callers cannot distinguish the cause.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::config::AuthConfig;
use crate::error::{AppError, Result};

/// Uniform message for any credential validation failure
const CREDENTIALS_ERROR: &str = "Could not validate credentials";

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Token expiration timestamp
    pub exp: usize,
    /// Token not before timestamp
    pub nbf: usize,
    /// Issued at timestamp
    pub iat: usize,
    /// Issuer
    pub iss: String,
    /// Unique token ID
    pub jti: String,
}

impl Claims {
    /// Create new claims for a subject
    pub fn new(sub: String, expiry_seconds: u64, issuer: String) -> Self {
        let now = Utc::now();
        let iat = now.timestamp() as usize;
        let exp = iat + expiry_seconds as usize;

        Self {
            sub,
            exp,
            nbf: iat,
            iat,
            iss: issuer,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Check if claims are expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() as usize > self.exp
    }
}

/// JWT based authentication
#[derive(Clone)]
pub struct JwtAuth {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    expiry_seconds: u64,
}

impl JwtAuth {
    /// Create new JWT authenticator
    pub fn new(secret: &str, issuer: &str, expiry_seconds: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.to_string(),
            expiry_seconds,
        }
    }

    /// Create from auth settings
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            &config.jwt_issuer,
            config.token_ttl_minutes * 60,
        )
    }

    /// Issue a signed, time-limited token for a subject
    pub fn issue_token(&self, sub: &str) -> Result<String> {
        let claims = Claims::new(sub.to_string(), self.expiry_seconds, self.issuer.clone());

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Validate a token and return its claims
    pub fn validate_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.clone()]);
        validation.validate_nbf = true;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|_| AppError::Unauthorized(CREDENTIALS_ERROR.to_string()))
    }

    /// Try to extract a bearer token from an Authorization header value
    pub fn extract_bearer(auth_header: Option<&str>) -> Option<&str> {
        match auth_header {
            Some(header) if header.starts_with("Bearer ") => Some(&header[7..]),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_auth() -> JwtAuth {
        JwtAuth::new("test-secret-at-least-32-chars-long!!", "mnemos", 3600)
    }

    #[test]
    fn test_issue_and_validate_roundtrip() {
        let auth = test_auth();
        let token = auth.issue_token("user_42").unwrap();
        let claims = auth.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "user_42");
        assert_eq!(claims.iss, "mnemos");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_garbage_token_is_unauthorized() {
        let auth = test_auth();
        let err = auth.validate_token("not-a-jwt").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_wrong_secret_is_unauthorized() {
        let auth = test_auth();
        let token = auth.issue_token("user_42").unwrap();

        let other = JwtAuth::new("another-secret-also-32-chars-long!!!", "mnemos", 3600);
        let err = other.validate_token(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_wrong_issuer_is_unauthorized() {
        let auth = test_auth();
        let token = auth.issue_token("user_42").unwrap();

        let other = JwtAuth::new("test-secret-at-least-32-chars-long!!", "someone-else", 3600);
        let err = other.validate_token(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn test_extract_bearer() {
        assert_eq!(JwtAuth::extract_bearer(Some("Bearer abc")), Some("abc"));
        assert_eq!(JwtAuth::extract_bearer(Some("ApiKey abc")), None);
        assert_eq!(JwtAuth::extract_bearer(None), None);
    }
}
