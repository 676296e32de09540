//! Service endpoint configuration

use serde::{Deserialize, Serialize};
use sohmon_core::{Error, Result};
use std::env;
use std::time::Duration;

/// Default backend base URL (the development Flask server)
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration shared by the prediction and answer clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl ServiceConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("SOHMON_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let timeout_secs = match env::var("SOHMON_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                Error::Configuration(format!(
                    "SOHMON_TIMEOUT_SECS must be a whole number of seconds, got {raw:?}"
                ))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            timeout_secs,
        })
    }

    /// Create configuration with an explicit endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Per-request timeout. The backend enforces none of its own, so this
    /// is the only bound on a hung request.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
