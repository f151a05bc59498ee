//! Configuration from environment variables.
//!
//! `API_BASE_URL` (required), `HOST` (default 0.0.0.0), `PORT` (default 8080),
//! `REQUEST_TIMEOUT_SECS` (default 10), `AUTO_ADVANCE_BYES` (default false).

use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("API_BASE_URL must be set to the tournament API address")]
    MissingApiBaseUrl,
    #[error("{key} has an invalid value: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub api_base_url: String,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    /// Resolve byes locally when a bracket arrives from the generator.
    pub auto_advance_byes: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

const DEFAULT_TIMEOUT_SECS: u64 = 10;

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("API_BASE_URL")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingApiBaseUrl)?;
        let host = lookup("HOST").unwrap_or_else(default_host);
        let port = parse_or("PORT", lookup("PORT"), default_port())?;
        let timeout_secs = parse_or(
            "REQUEST_TIMEOUT_SECS",
            lookup("REQUEST_TIMEOUT_SECS"),
            DEFAULT_TIMEOUT_SECS,
        )?;
        let auto_advance_byes = parse_or("AUTO_ADVANCE_BYES", lookup("AUTO_ADVANCE_BYES"), false)?;
        Ok(Self {
            api_base_url,
            host,
            port,
            request_timeout: Duration::from_secs(timeout_secs),
            auto_advance_byes,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => {
            let parsed = v.trim().parse::<T>();
            parsed.map_err(|_| ConfigError::InvalidValue { key, value: v })
        }
    }
}
