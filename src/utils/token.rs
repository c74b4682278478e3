use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::get_config;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub exp: usize,
}

/// Issues an HS256 access token for an authenticated user. The lifetime
/// comes from `TOKEN_TTL_SECS`; `exp` is always set.
pub fn issue_token(name: &str, email: &str) -> Result<String> {
    let config = get_config();
    let expires_at = chrono::Utc::now() + chrono::Duration::seconds(config.token_ttl_secs as i64);
    let claims = Claims {
        sub: email.to_string(),
        name: name.to_string(),
        exp: expires_at.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| Error::Internal(format!("Failed to sign token: {}", e)))
}

/// Verifies signature and expiry of a presented bearer token.
pub fn decode_token(token: &str) -> Result<Claims> {
    let config = get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| Error::Unauthorized("invalid_token".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn setup_config() {
        env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
        env::set_var("DATABASE_URL", "postgres://localhost/test");
        env::set_var("JWT_SECRET", "unit_test_secret");
        env::set_var("CLOUDINARY_CLOUD_NAME", "test-cloud");
        env::set_var("CLOUDINARY_API_KEY", "key");
        env::set_var("CLOUDINARY_API_SECRET", "secret");
        let _ = crate::config::init_config();
    }

    #[test]
    fn issue_then_decode_returns_claims() {
        setup_config();
        let token = issue_token("Alice", "alice@example.com").expect("issue");
        assert!(!token.is_empty());
        let claims = decode_token(&token).expect("decode");
        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.name, "Alice");
    }

    #[test]
    fn expired_token_is_rejected() {
        setup_config();
        let config = get_config();
        // Expired well past the default leeway.
        let claims = Claims {
            sub: "old@example.com".to_string(),
            name: "Old".to_string(),
            exp: (chrono::Utc::now() - chrono::Duration::hours(2)).timestamp() as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
        )
        .expect("encode");
        assert!(decode_token(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        setup_config();
        let token = issue_token("Alice", "alice@example.com").expect("issue");
        let tampered = format!("{}x", token);
        assert!(decode_token(&tampered).is_err());
    }
}
