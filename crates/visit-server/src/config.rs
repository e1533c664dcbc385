use std::path::PathBuf;

use anyhow::{Context, Result};

/// Longest accepted session, one year.
pub const MAX_SESSION_HOURS: i64 = 24 * 365;

/// Placeholder secret used when `VISIT_JWT_SECRET` is unset.
pub const DEV_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    /// Frontend origin allowed to send credentials. Any origin, without
    /// credentials, when unset.
    pub client_url: Option<String>,
    pub session_hours: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port = var("VISIT_PORT", "3000");
        let session_hours = var("VISIT_SESSION_HOURS", "7");

        Ok(Self {
            host: var("VISIT_HOST", "0.0.0.0"),
            port: port
                .parse()
                .with_context(|| format!("Invalid VISIT_PORT '{}'", port))?,
            db_path: PathBuf::from(var("VISIT_DB_PATH", "visit.db")),
            jwt_secret: var("VISIT_JWT_SECRET", DEV_SECRET),
            client_url: lookup("VISIT_CLIENT_URL").filter(|v| !v.is_empty()),
            session_hours: session_hours
                .parse::<i64>()
                .ok()
                .filter(|h| (1..=MAX_SESSION_HOURS).contains(h))
                .with_context(|| format!("Invalid VISIT_SESSION_HOURS '{}'", session_hours))?,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_SECRET
    }
}
