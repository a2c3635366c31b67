use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject, the user's database id.
    pub sub: i32,
    /// The user's email address.
    pub email: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
}

/// Why a presented access token was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// The token's expiry has passed.
    #[error("token expired")]
    Expired,
    /// The signature does not match the signing key.
    #[error("invalid signature")]
    InvalidSignature,
    /// The token is not a well-formed JWT.
    #[error("malformed token")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed,
        }
    }
}

/// Signs an HS256 access token for the given user.
///
/// The token expires `access_token_ttl_minutes` from now and is never
/// persisted or revoked; its lifetime is the only thing bounding it.
pub fn issue(
    user_id: i32,
    email: &str,
    config: &Config,
) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = (Utc::now() + Duration::minutes(config.access_token_ttl_minutes)).timestamp();

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp,
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
}

/// Validates and decodes an access token, returning the embedded [`Claims`].
///
/// Expiry is checked with zero leeway.
pub fn verify(token: &str, config: &Config) -> Result<Claims, TokenError> {
    let mut validation = Validation::default(); // HS256, validates exp
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use zeroize::Zeroizing;

    /// Helper to build a test config with a known secret.
    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            jwt_secret: Zeroizing::new("test-secret-that-is-long-enough-for-hmac".to_string()),
            access_token_ttl_minutes: 10,
            refresh_token_ttl_days: 7,
            listen_addr: "127.0.0.1:0".to_string(),
        }
    }

    #[test]
    fn issue_then_verify_round_trips() {
        let config = test_config();
        let token = issue(42, "ada@example.com", &config).expect("token generation should succeed");

        let claims = verify(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.email, "ada@example.com");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();

        // Manually craft an already-expired token.
        let claims = Claims {
            sub: 1,
            email: "ada@example.com".to_string(),
            exp: Utc::now().timestamp() - 300,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert_eq!(verify(&token, &config).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let config = test_config();
        let mut other = test_config();
        other.jwt_secret = Zeroizing::new("a-different-secret-entirely".to_string());

        let token = issue(1, "ada@example.com", &other).expect("token generation should succeed");

        assert_eq!(
            verify(&token, &config).unwrap_err(),
            TokenError::InvalidSignature
        );
    }

    #[test]
    fn garbage_is_malformed() {
        let config = test_config();
        assert_eq!(verify("not-a-jwt", &config).unwrap_err(), TokenError::Malformed);
    }
}
