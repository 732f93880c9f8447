use anyhow::{Context, Result, bail};
use std::path::PathBuf;
use tracing::warn;

use board_types::limits::TOKEN_LIFETIME_HOURS;

/// Secrets that ship in examples and must never sign real tokens.
const PLACEHOLDER_SECRETS: &[&str] = &["change-me-to-a-random-string", "dev-secret-change-me"];

/// Process configuration, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub token_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` passes the process environment.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = var("BOARD_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() {
            bail!("BOARD_JWT_SECRET is unset or empty");
        }
        if PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            warn!("BOARD_JWT_SECRET is still a placeholder value; set a random secret");
        }

        let db_path = var("BOARD_DB_PATH")
            .unwrap_or_else(|| "board.db".into())
            .into();
        let host = var("BOARD_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("BOARD_PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .context("Invalid BOARD_PORT")?;

        let token_ttl_hours: i64 = match var("BOARD_TOKEN_TTL_HOURS") {
            Some(v) => v.parse().context("Invalid BOARD_TOKEN_TTL_HOURS")?,
            None => TOKEN_LIFETIME_HOURS,
        };
        if token_ttl_hours <= 0 {
            bail!("BOARD_TOKEN_TTL_HOURS must be positive, got {}", token_ttl_hours);
        }

        Ok(Self {
            jwt_secret,
            db_path,
            host,
            port,
            token_ttl_hours,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
