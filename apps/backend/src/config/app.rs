//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use crate::error::AppError;

const MIN_JWT_SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Postgres or SQLite URL; `None` keeps rooms in memory.
    pub database_url: Option<String>,
    /// Enables the stalled-phase watchdog when set.
    pub night_timeout: Option<Duration>,
}

impl AppConfig {
    /// Load and validate configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which returns a variable's value
    /// if it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("BACKEND_HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("BACKEND_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                AppError::config(format!(
                    "BACKEND_PORT must be a valid port number, got '{raw}'"
                ))
            })?,
            None => 3001,
        };

        let jwt_secret = match lookup("BACKEND_JWT_SECRET") {
            Some(secret) if secret.len() >= MIN_JWT_SECRET_LEN => secret,
            Some(_) => {
                return Err(AppError::config(format!(
                    "BACKEND_JWT_SECRET is too short. It should be at least {MIN_JWT_SECRET_LEN} characters."
                )))
            }
            None => return Err(AppError::config("BACKEND_JWT_SECRET must be set")),
        };

        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let night_timeout = match lookup("NIGHT_ACTION_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(0) | Err(_) => {
                    return Err(AppError::config(format!(
                        "NIGHT_ACTION_TIMEOUT_SECS must be a positive number of seconds, got '{raw}'"
                    )))
                }
                Ok(secs) => Some(Duration::from_secs(secs)),
            },
            None => None,
        };

        Ok(AppConfig {
            host,
            port,
            jwt_secret,
            database_url,
            night_timeout,
        })
    }
}
