//! Application configuration loaded from environment.

use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from `.env` and environment variables.
/// Read once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (`0.0.0.0:<PORT>`).
    pub server_addr: SocketAddr,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Lifetime of issued session tokens.
    pub token_expiry: Duration,
    /// Upper bound on the time spent serving a single request.
    pub request_timeout: Duration,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigLoadError::Missing(key))
        };

        let port = match lookup("PORT") {
            Some(p) => p.trim().parse::<u16>().map_err(|_| ConfigLoadError::InvalidPort(p))?,
            None => DEFAULT_PORT,
        };
        let server_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;
        let expires_in = required("EXPIRES_IN")?;
        let token_expiry = parse_expiry(&expires_in)?;

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(s) => Duration::from_secs(
                s.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigLoadError::InvalidTimeout(s))?,
            ),
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            server_addr,
            database_url,
            jwt_secret,
            token_expiry,
            request_timeout,
            log_level,
        })
    }
}

/// Parse a token lifetime: plain seconds (`3600`) or a number with a unit
/// suffix (`30s`, `15m`, `12h`, `7d`, `2w`).
pub fn parse_expiry(raw: &str) -> Result<Duration, ConfigLoadError> {
    let value = raw.trim();
    let invalid = || ConfigLoadError::InvalidExpiry(raw.to_string());

    let split = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    let (digits, unit) = value.split_at(split);
    let amount: u64 = digits.parse().map_err(|_| invalid())?;

    let multiplier = match unit.trim() {
        "" | "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        "d" => 24 * 60 * 60,
        "w" => 7 * 24 * 60 * 60,
        _ => return Err(invalid()),
    };
    let secs = amount.checked_mul(multiplier).ok_or_else(invalid)?;
    if secs == 0 {
        return Err(invalid());
    }
    Ok(Duration::from_secs(secs))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Missing required variable {0}")]
    Missing(&'static str),
    #[error("Invalid PORT: {0}")]
    InvalidPort(String),
    #[error("Invalid EXPIRES_IN: {0}")]
    InvalidExpiry(String),
    #[error("Invalid REQUEST_TIMEOUT_SECS: {0}")]
    InvalidTimeout(String),
}
