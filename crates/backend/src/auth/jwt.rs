//! JWT token creation and validation.

use anyhow::Context;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::types::{AuthConfig, Claims};

/// Create a signed HS256 token for `subject` that expires after `ttl`.
pub fn create_token(
    config: &AuthConfig,
    subject: &str,
    ttl: Duration,
) -> anyhow::Result<String> {
    let now = Utc::now();
    let exp = now
        .checked_add_signed(ttl)
        .context("Token expiry out of range")?;

    let claims = Claims {
        sub: Some(subject.to_string()),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .context("Failed to sign token")
}

/// Validate a JWT token and return claims.
///
/// A token is expired from the second its `exp` is reached; no leeway.
pub fn validate_token(
    config: &AuthConfig,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )?;

    if token_data.claims.exp <= Utc::now().timestamp() {
        return Err(ErrorKind::ExpiredSignature.into());
    }

    Ok(token_data.claims)
}
