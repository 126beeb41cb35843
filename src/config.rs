use chrono::Duration;
use serde::Serialize;
use std::env;
use std::fmt;

/// Signing key used when `JWT_SECRET` is unset. Only fit for local runs.
pub const DEV_JWT_SECRET: &str = "dev-secret";

/// Which store implementation backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub storage: StorageBackend,
    pub database_url: String,
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

/// A variable was present but could not be used.
#[derive(Debug, PartialEq, Eq)]
pub struct ConfigError {
    pub variable: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}={:?}: {}", self.variable, self.value, self.reason)
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_port = match var("SERVER_PORT") {
            Some(raw) => raw.trim().parse().map_err(|_| ConfigError {
                variable: "SERVER_PORT",
                value: raw,
                reason: "must be a port number",
            })?,
            None => 8080,
        };

        let storage = match var("STORAGE_BACKEND") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "sqlite" => StorageBackend::Sqlite,
                _ => {
                    return Err(ConfigError {
                        variable: "STORAGE_BACKEND",
                        value: raw,
                        reason: "must be `memory` or `sqlite`",
                    })
                }
            },
            None => StorageBackend::Sqlite,
        };

        let token_ttl = match var("TOKEN_TTL_HOURS") {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(hours) if hours > 0 => Duration::hours(hours),
                _ => {
                    return Err(ConfigError {
                        variable: "TOKEN_TTL_HOURS",
                        value: raw,
                        reason: "must be a positive number of hours",
                    })
                }
            },
            None => Duration::hours(24),
        };

        Ok(Self {
            server_host: var("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port,
            storage,
            database_url: var("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:kanban.db?mode=rwc".to_string()),
            jwt_secret: var("JWT_SECRET").unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
            token_ttl,
        })
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}
