//! Server configuration read from the environment (after `.env` is loaded).

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::db::PoolSettings;
use crate::domain::transaction::PricePolicy;
use crate::forecast::DEFAULT_TIMEOUT;

pub const DEFAULT_FORECAST_SERVICE_URL: &str = "http://localhost:8000";
const DEFAULT_DATABASE_NAME: &str = "sales";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// Path of the SQLite database file.
    pub database_url: String,
    pub pool: PoolSettings,
    /// Drop and recreate all tables on startup.
    pub reset_database: bool,
    pub forecast_service_url: String,
    pub forecast_timeout: Duration,
    pub price_policy: PricePolicy,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Unset and blank
    /// keys fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let database_url = match (get("DATABASE_URL"), get("DB_NAME")) {
            (Some(url), _) => url,
            (None, Some(name)) if name.ends_with(".db") => name,
            (None, Some(name)) => format!("{name}.db"),
            (None, None) => format!("{DEFAULT_DATABASE_NAME}.db"),
        };

        let defaults = PoolSettings::default();
        let pool = PoolSettings {
            max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_idle: parse_or(&get, "DB_MIN_IDLE", defaults.min_idle)?,
            max_lifetime: Duration::from_secs(parse_or(
                &get,
                "DB_MAX_LIFETIME_SECS",
                defaults.max_lifetime.as_secs(),
            )?),
        };

        Ok(Self {
            address: get("ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&get, "PORT", 8080)?,
            database_url,
            pool,
            reset_database: parse_flag(&get, "DB_RESET_ON_START")?,
            forecast_service_url: get("FORECAST_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_FORECAST_SERVICE_URL.to_string()),
            forecast_timeout: Duration::from_secs(parse_or(
                &get,
                "FORECAST_TIMEOUT_SECS",
                DEFAULT_TIMEOUT.as_secs(),
            )?),
            price_policy: parse_or(&get, "TRANSACTION_PRICE_POLICY", PricePolicy::default())?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|err: T::Err| ConfigError::InvalidValue {
            key,
            reason: err.to_string(),
            value,
        }),
    }
}

fn parse_flag<G>(get: &G, key: &'static str) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let Some(value) = get(key) else {
        return Ok(false);
    };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value,
            reason: "expected true or false".to_string(),
        }),
    }
}
