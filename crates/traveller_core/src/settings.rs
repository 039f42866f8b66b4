//! crates/traveller_core/src/settings.rs
//!
//! Tunables shared by the stores. Defaults match the behaviour the client
//! has always had; the service crate overrides them from the environment.

use std::str::FromStr;
use std::time::Duration;

/// The durable storage key holding the serialized session.
pub const SESSION_STORAGE_KEY: &str = "login-storage";

/// Bounded retry with a fixed delay between attempts (no backoff growth).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(1),
        }
    }
}

/// What the alerts store shows once every retry has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertsFallback {
    /// Show the built-in sample alerts, marked as a fallback.
    #[default]
    Defaults,
    /// Keep a failed state the view has to render as an error.
    Surface,
}

impl FromStr for AlertsFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "defaults" | "default" => Ok(AlertsFallback::Defaults),
            "surface" => Ok(AlertsFallback::Surface),
            other => Err(format!("'{}' is not one of: defaults, surface", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub retry: RetryPolicy,
    pub alerts_fallback: AlertsFallback,
    pub session_key: String,
    /// Upper bound for acquiring the device position before an SOS alert.
    pub location_timeout: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            alerts_fallback: AlertsFallback::default(),
            session_key: SESSION_STORAGE_KEY.to_string(),
            location_timeout: Duration::from_secs(10),
        }
    }
}
