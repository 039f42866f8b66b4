//! services/gateway/src/config.rs
//!
//! Defines the configuration structures and their loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use tracing::Level;
use traveller_core::{AlertsFallback, RetryPolicy, StoreSettings, SESSION_STORAGE_KEY};

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

fn load_dotenv() {
    // Only load from .env in non-test mode to avoid contamination.
    if !cfg!(test) {
        dotenvy::dotenv().ok();
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = var_or(name, default);
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}

fn parse_log_level() -> Result<Level, ConfigError> {
    let log_level_str = var_or("RUST_LOG", "INFO");
    log_level_str.parse::<Level>().map_err(|_| {
        ConfigError::InvalidValue(
            "RUST_LOG".to_string(),
            format!("'{}' is not a valid log level", log_level_str),
        )
    })
}

//=========================================================================================
// Mock gateway server
//=========================================================================================

/// Holds the mock gateway's configuration, loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_origin: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();

        let bind_address = parse_var::<SocketAddr>("BIND_ADDRESS", "0.0.0.0:8000")?;
        let log_level = parse_log_level()?;
        let cors_origin = var_or("CORS_ORIGIN", "http://localhost:5173");

        Ok(Self {
            bind_address,
            log_level,
            cors_origin,
        })
    }
}

//=========================================================================================
// Client
//=========================================================================================

/// Holds everything needed to build the client stores against a gateway.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub gateway_url: String,
    pub session_dir: PathBuf,
    pub store: StoreSettings,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();

        let gateway_url = var_or("GATEWAY_URL", "http://127.0.0.1:8000");
        if !gateway_url.starts_with("http://") && !gateway_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue(
                "GATEWAY_URL".to_string(),
                format!("'{}' is not an http(s) URL", gateway_url),
            ));
        }

        let session_dir = PathBuf::from(var_or("SESSION_DIR", "./.traveller"));

        let max_attempts = parse_var::<u32>("RETRY_ATTEMPTS", "3")?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "RETRY_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let delay = Duration::from_millis(parse_var::<u64>("RETRY_DELAY_MS", "1000")?);
        let alerts_fallback = parse_var::<AlertsFallback>("ALERTS_FALLBACK", "defaults")?;
        let location_timeout =
            Duration::from_secs(parse_var::<u64>("LOCATION_TIMEOUT_SECS", "10")?);

        Ok(Self {
            gateway_url,
            session_dir,
            store: StoreSettings {
                retry: RetryPolicy {
                    max_attempts,
                    delay,
                },
                alerts_fallback,
                session_key: SESSION_STORAGE_KEY.to_string(),
                location_timeout,
            },
        })
    }
}
