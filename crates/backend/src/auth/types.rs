//! Auth-related types and configuration.

use std::fmt;

use anyhow::Context;
use serde::{Deserialize, Serialize};

// Re-export shared types for convenience
pub use shared_types::{BasicCredentials, TokenResponse, UserProfile};

/// Placeholder signing key used when `JWT_SECRET` is not supplied.
pub const PLACEHOLDER_JWT_SECRET: &str =
    "09d25e094faa6ca2556c818166b7a9563b93f7099f6f0f4caa6cf63b88e8d3e7";

/// Token lifetime used when neither the caller nor the environment sets one.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;

/// Longest lifetime accepted from configuration: one year.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 365 * 24 * 60;

/// JWT Claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username). Optional on decode so a token without one is
    /// rejected by the gateway rather than by the JSON layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// One registered user, as loaded at startup.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Account {
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub hashed_password: String,
    #[serde(default)]
    pub disabled: bool,
}

impl Account {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            username: self.username.clone(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            disabled: self.disabled,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("hashed_password", &"<redacted>")
            .field("disabled", &self.disabled)
            .finish()
    }
}

/// The account bound to a single request after bearer-token verification.
#[derive(Debug, Clone)]
pub struct AuthenticatedIdentity {
    pub account: Account,
}

/// Auth configuration loaded from environment
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: PLACEHOLDER_JWT_SECRET.to_string(),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
        }
    }
}

impl AuthConfig {
    /// Load auth configuration from environment variables.
    ///
    /// Optional env vars:
    /// - `JWT_SECRET`: Secret key for signing JWTs (placeholder if unset)
    /// - `ACCESS_TOKEN_EXPIRE_MINUTES`: Token lifetime, defaults to 30
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            jwt_secret: jwt_secret_or_placeholder(std::env::var("JWT_SECRET").ok()),
            token_ttl_minutes: parse_token_ttl(
                std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES").ok(),
            )?,
        })
    }

    /// Configured lifetime, kept within `1..=MAX_TOKEN_TTL_MINUTES`.
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.token_ttl_minutes.clamp(1, MAX_TOKEN_TTL_MINUTES))
    }
}

fn jwt_secret_or_placeholder(raw: Option<String>) -> String {
    match raw {
        Some(secret) if !secret.trim().is_empty() => secret,
        _ => {
            tracing::warn!("JWT_SECRET not set, signing tokens with the built-in placeholder key");
            PLACEHOLDER_JWT_SECRET.to_string()
        }
    }
}

fn parse_token_ttl(raw: Option<String>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TOKEN_TTL_MINUTES);
    };

    let minutes: i64 = raw
        .trim()
        .parse()
        .context("ACCESS_TOKEN_EXPIRE_MINUTES must be a whole number")?;
    if minutes <= 0 {
        anyhow::bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be positive");
    }
    if minutes > MAX_TOKEN_TTL_MINUTES {
        anyhow::bail!(
            "ACCESS_TOKEN_EXPIRE_MINUTES must be at most {}",
            MAX_TOKEN_TTL_MINUTES
        );
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_hash() {
        let account = Account {
            username: "johndoe".to_string(),
            full_name: None,
            email: None,
            hashed_password: "$2b$12$secret-material".to_string(),
            disabled: false,
        };
        let printed = format!("{:?}", account);
        assert!(printed.contains("johndoe"));
        assert!(!printed.contains("secret-material"));
    }

    #[test]
    fn test_default_ttl_is_thirty_minutes() {
        assert_eq!(AuthConfig::default().token_ttl(), chrono::Duration::minutes(30));
    }

    #[test]
    fn test_token_ttl_clamped_to_ceiling() {
        let config = AuthConfig {
            jwt_secret: "k".to_string(),
            token_ttl_minutes: i64::MAX,
        };
        assert_eq!(
            config.token_ttl(),
            chrono::Duration::minutes(MAX_TOKEN_TTL_MINUTES)
        );
    }

    #[test]
    fn test_token_ttl_parsing() {
        assert_eq!(parse_token_ttl(None).unwrap(), DEFAULT_TOKEN_TTL_MINUTES);
        assert_eq!(parse_token_ttl(Some(" 45 ".to_string())).unwrap(), 45);
        assert_eq!(
            parse_token_ttl(Some(MAX_TOKEN_TTL_MINUTES.to_string())).unwrap(),
            MAX_TOKEN_TTL_MINUTES
        );
    }

    #[test]
    fn test_token_ttl_rejects_bad_values() {
        for raw in ["abc", "", "1.5", "0", "-10", "1000000000000"] {
            assert!(
                parse_token_ttl(Some(raw.to_string())).is_err(),
                "{:?} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_blank_secret_falls_back_to_placeholder() {
        assert_eq!(jwt_secret_or_placeholder(None), PLACEHOLDER_JWT_SECRET);
        assert_eq!(
            jwt_secret_or_placeholder(Some("   ".to_string())),
            PLACEHOLDER_JWT_SECRET
        );
        assert_eq!(jwt_secret_or_placeholder(Some("s3cret".to_string())), "s3cret");
    }
}
