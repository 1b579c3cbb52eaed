use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::auth::types::AuthConfig;

#[derive(Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub auth: AuthConfig,
    /// TOML file with `[[accounts]]`; built-in demo accounts when unset.
    pub accounts_file: Option<PathBuf>,
    /// `None` means wide-open CORS with credentials.
    pub cors_allowed_origins: Option<Vec<String>>,
    pub echo_max_wait: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            auth: AuthConfig::default(),
            accounts_file: None,
            cors_allowed_origins: None,
            echo_max_wait: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            bind_addr: parse_bind_addr(env::var("BIND_ADDR").ok(), defaults.bind_addr)?,
            auth: AuthConfig::from_env()?,
            accounts_file: env::var("ACCOUNTS_FILE").ok().map(PathBuf::from),
            cors_allowed_origins: parse_cors_origins(env::var("CORS_ALLOWED_ORIGINS").ok()),
            echo_max_wait: parse_echo_max_wait(
                env::var("ECHO_MAX_WAIT_SECS").ok(),
                defaults.echo_max_wait,
            )?,
        })
    }
}

fn parse_bind_addr(raw: Option<String>, default: SocketAddr) -> Result<SocketAddr> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .context("BIND_ADDR must be a socket address like 0.0.0.0:3000"),
        None => Ok(default),
    }
}

fn parse_echo_max_wait(raw: Option<String>, default: Duration) -> Result<Duration> {
    match raw {
        Some(raw) => {
            let secs: u64 = raw
                .trim()
                .parse()
                .context("ECHO_MAX_WAIT_SECS must be a whole number of seconds")?;
            Ok(Duration::from_secs(secs))
        }
        None => Ok(default),
    }
}

fn parse_cors_origins(raw: Option<String>) -> Option<Vec<String>> {
    raw.map(|origins| {
        origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}
