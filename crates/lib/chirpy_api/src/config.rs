//! API server configuration.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

/// Startup misconfiguration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set and non-empty")]
    Missing(&'static str),

    #[error("unknown platform: {0}")]
    UnknownPlatform(String),
}

/// Deployment flavour. Only `Dev` may reset state through the admin API.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Platform {
    Dev,
    #[default]
    Production,
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(Platform::Dev),
            "" | "prod" | "production" => Ok(Platform::Production),
            other => Err(ConfigError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8080").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// Static API key expected from the Polka billing webhook.
    pub polka_key: String,
    /// Deployment flavour.
    pub platform: Platform,
    /// Directory served under `/app`.
    pub fileserver_root: PathBuf,
}

impl ApiConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable          | Default                             |
    /// |-------------------|-------------------------------------|
    /// | `BIND_ADDR`       | `127.0.0.1:8080`                    |
    /// | `DB_URL`          | `postgres://localhost:5432/chirpy`  |
    /// | `JWT_SECRET`      | required                            |
    /// | `POLKA_KEY`       | required                            |
    /// | `PLATFORM`        | `production`                        |
    /// | `FILESERVER_ROOT` | `public`                            |
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into()),
            database_url: std::env::var("DB_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/chirpy".into()),
            jwt_secret: required_env("JWT_SECRET")?,
            polka_key: required_env("POLKA_KEY")?,
            platform: std::env::var("PLATFORM").unwrap_or_default().parse()?,
            fileserver_root: std::env::var("FILESERVER_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
        })
    }

    /// Reject configurations that would run without working credentials.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::Missing("JWT_SECRET"));
        }
        if self.polka_key.is_empty() {
            return Err(ConfigError::Missing("POLKA_KEY"));
        }
        Ok(())
    }
}

fn required_env(name: &'static str) -> Result<String, ConfigError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}
