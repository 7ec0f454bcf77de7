// src/config.rs

use dividend_query::client::DEFAULT_BASE_URL;
use std::env;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub provider_base_url: String,
    pub api_key: String,
    pub cache_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            provider_base_url: DEFAULT_BASE_URL.to_string(),
            api_key: "demo".to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl ServerConfig {
    /// Reads the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();
        let cache_ttl = match lookup("DIVIDEND_CACHE_TTL_SECS") {
            Some(value) => Duration::from_secs(value.trim().parse::<u64>().map_err(|_| {
                ConfigError::InvalidValue {
                    key: "DIVIDEND_CACHE_TTL_SECS".to_string(),
                    value,
                }
            })?),
            None => defaults.cache_ttl,
        };

        Ok(ServerConfig {
            bind_addr: lookup("DIVIDEND_SERVER_ADDR").unwrap_or(defaults.bind_addr),
            provider_base_url: lookup("ALPHAVANTAGE_BASE_URL").unwrap_or(defaults.provider_base_url),
            api_key: lookup("ALPHAVANTAGE_API_KEY").unwrap_or(defaults.api_key),
            cache_ttl,
        })
    }
}
