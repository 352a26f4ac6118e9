use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::DbError;

/// Logical database role. Each target gets its own configuration and its own
/// lazily-created connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
pub enum Target {
    /// Read replica / read role
    Read,
    /// Primary / write role
    Write,
}

impl Target {
    /// The `{TARGET}` portion of the `DB_{TARGET}_*` environment variables.
    #[must_use]
    pub fn env_infix(self) -> &'static str {
        match self {
            Target::Read => "READ",
            Target::Write => "WRITE",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.env_infix())
    }
}

/// Connection settings for one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub charset: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: "database".to_string(),
            charset: "utf8mb4".to_string(),
        }
    }
}

impl ConnectionConfig {
    /// Resolve the configuration for `target` from `DB_{TARGET}_*` environment
    /// variables, falling back to the documented defaults for absent ones.
    ///
    /// # Errors
    /// Returns `DbError::Config` if `DB_{TARGET}_PORT` is present but not a
    /// valid port number.
    pub fn from_env(target: Target) -> Result<Self, DbError> {
        let infix = target.env_infix();
        let mut config = Self::default();

        if let Some(host) = env_var(&format!("DB_{infix}_HOST")) {
            config.host = host;
        }
        if let Some(port) = env_var(&format!("DB_{infix}_PORT")) {
            config.port = port.parse().map_err(|_| {
                DbError::Config(format!("DB_{infix}_PORT is not a valid port: {port}"))
            })?;
        }
        if let Some(user) = env_var(&format!("DB_{infix}_USER")) {
            config.user = user;
        }
        if let Some(password) = env_var(&format!("DB_{infix}_PASSWORD")) {
            config.password = password;
        }
        if let Some(database) = env_var(&format!("DB_{infix}_DATABASE")) {
            config.database = database;
        }
        if let Some(charset) = env_var(&format!("DB_{infix}_CHARSET")) {
            config.charset = charset;
        }

        Ok(config)
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Bounded retry-with-backoff policy for connection establishment.
///
/// Retry applies only to opening a connection, never to statement execution:
/// re-running a non-idempotent write could duplicate effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the retry following failed attempt `attempt` (1-based):
    /// `base_delay * 2^(attempt - 1)`.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}
