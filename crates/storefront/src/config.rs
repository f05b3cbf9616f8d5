//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BLOOMCART_API_BASE_URL` - Marketplace backend base URL
//!   (default: `http://localhost:8080/api`)
//! - `BLOOMCART_API_TOKEN` - Bearer token for authenticated endpoints
//! - `RAZORPAY_KEY_ID` - Payment processor key; when absent checkout
//!   finalizes offline instead of opening the payment widget
//! - `BLOOMCART_DATA_DIR` - Directory for locally persisted state
//!   (default: `.bloomcart`)
//! - `BLOOMCART_AUTO_DELIVER_SECS` - Delay before a paid order is
//!   auto-marked delivered (default: 5)
//! - `BLOOMCART_TRACKING_TICK_SECS` - Tracking-view progress interval
//!   (default: 5)

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_DATA_DIR: &str = ".bloomcart";
const DEFAULT_AUTO_DELIVER_SECS: u64 = 5;
const DEFAULT_TRACKING_TICK_SECS: u64 = 5;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct StorefrontConfig {
    /// Marketplace backend base URL (e.g. `http://localhost:8080/api`)
    pub api_base_url: Url,
    /// Bearer token for authenticated backend endpoints
    pub api_token: Option<SecretString>,
    /// Razorpay key id; `None` disables the payment widget path
    pub razorpay_key_id: Option<String>,
    /// Directory for the local state store (cart, coupon, order ledger)
    pub data_dir: PathBuf,
    /// Delay before a paid order is auto-advanced to delivered
    pub auto_deliver_after: Duration,
    /// Period of the tracking-view progress timer
    pub tracking_tick: Duration,
}

impl std::fmt::Debug for StorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontConfig")
            .field("api_base_url", &self.api_base_url.as_str())
            .field(
                "api_token",
                &self.api_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("razorpay_key_id", &self.razorpay_key_id)
            .field("data_dir", &self.data_dir)
            .field("auto_deliver_after", &self.auto_deliver_after)
            .field("tracking_tick", &self.tracking_tick)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_env_or_default("BLOOMCART_API_BASE_URL", DEFAULT_API_BASE_URL)
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("BLOOMCART_API_BASE_URL".to_string(), e.to_string())
            })?;
        let api_token = get_optional_env("BLOOMCART_API_TOKEN").map(SecretString::from);
        let razorpay_key_id = get_optional_env("RAZORPAY_KEY_ID");
        let data_dir =
            PathBuf::from(get_env_or_default("BLOOMCART_DATA_DIR", DEFAULT_DATA_DIR));
        let auto_deliver_after = get_duration_secs(
            "BLOOMCART_AUTO_DELIVER_SECS",
            DEFAULT_AUTO_DELIVER_SECS,
        )?;
        let tracking_tick =
            get_duration_secs("BLOOMCART_TRACKING_TICK_SECS", DEFAULT_TRACKING_TICK_SECS)?;

        Ok(Self {
            api_base_url,
            api_token,
            razorpay_key_id,
            data_dir,
            auto_deliver_after,
            tracking_tick,
        })
    }

    /// Configuration suitable for tests and demos: local backend, no
    /// token, no payment key, state under the given directory.
    #[must_use]
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL)
                .unwrap_or_else(|_| unreachable!("default base URL is valid")),
            api_token: None,
            razorpay_key_id: None,
            data_dir: data_dir.into(),
            auto_deliver_after: Duration::from_secs(DEFAULT_AUTO_DELIVER_SECS),
            tracking_tick: Duration::from_secs(DEFAULT_TRACKING_TICK_SECS),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get a duration in whole seconds with a default value.
fn get_duration_secs(key: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(Duration::from_secs(default_secs)),
    }
}
