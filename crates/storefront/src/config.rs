//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `MARCHE_HOST` - Bind address (default: 127.0.0.1)
//! - `MARCHE_PORT` - Listen port (default: 3000)
//! - `MARCHE_DATA_DIR` - Directory for persisted shopper state (default: in-memory only)
//! - `MARCHE_CART_REVEAL_DELAY_MS` - Delay before the cart panel opens after an add (default: 300, 0 = immediately)
//! - `MARCHE_NOTIFICATION_DURATION_MS` - Default notification lifetime (default: 3000)
//! - `MARCHE_SHOPPER_IDLE_SECS` - Idle time before a shopper is unloaded from memory (default: 1800)
//! - `MARCHE_FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 50000)
//! - `MARCHE_SHIPPING_FEE` - Flat shipping fee (default: 3275)
//! - `MARCHE_SECURE_COOKIES` - Mark the session cookie `Secure` (default: false)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance trace sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use marche_core::{DEFAULT_NOTIFICATION_DURATION_MS, ShippingPolicy};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::shopper::ShopperSettings;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory for persisted shopper state; `None` keeps state in memory
    pub data_dir: Option<PathBuf>,
    /// Delay before the cart panel opens after an add
    pub cart_reveal_delay: Duration,
    /// Lifetime of notifications that do not set their own
    pub notification_duration: Duration,
    /// Idle time before a shopper's stores are unloaded
    pub shopper_idle: Duration,
    /// Shipping fee policy applied at checkout
    pub shipping: ShippingPolicy,
    /// Whether the session cookie requires HTTPS
    pub secure_cookies: bool,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_dir: None,
            cart_reveal_delay: Duration::from_millis(300),
            notification_duration: Duration::from_millis(DEFAULT_NOTIFICATION_DURATION_MS),
            shopper_idle: Duration::from_secs(30 * 60),
            shipping: ShippingPolicy::default(),
            secure_cookies: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to a value that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let shipping = ShippingPolicy {
            free_shipping_threshold: parse_or(
                &lookup,
                "MARCHE_FREE_SHIPPING_THRESHOLD",
                defaults.shipping.free_shipping_threshold,
            )?,
            flat_fee: parse_or(&lookup, "MARCHE_SHIPPING_FEE", defaults.shipping.flat_fee)?,
        };
        if shipping.flat_fee < Decimal::ZERO {
            return Err(ConfigError::InvalidEnvVar(
                "MARCHE_SHIPPING_FEE".to_string(),
                "must not be negative".to_string(),
            ));
        }

        Ok(Self {
            host: parse_or(&lookup, "MARCHE_HOST", defaults.host)?,
            port: parse_or(&lookup, "MARCHE_PORT", defaults.port)?,
            data_dir: lookup("MARCHE_DATA_DIR")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
            cart_reveal_delay: Duration::from_millis(parse_or(
                &lookup,
                "MARCHE_CART_REVEAL_DELAY_MS",
                300,
            )?),
            notification_duration: Duration::from_millis(parse_or(
                &lookup,
                "MARCHE_NOTIFICATION_DURATION_MS",
                DEFAULT_NOTIFICATION_DURATION_MS,
            )?),
            shopper_idle: Duration::from_secs(parse_or(
                &lookup,
                "MARCHE_SHOPPER_IDLE_SECS",
                30 * 60,
            )?),
            shipping,
            secure_cookies: parse_or(&lookup, "MARCHE_SECURE_COOKIES", defaults.secure_cookies)?,
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_or(&lookup, "SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_or(&lookup, "SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Per-shopper store settings derived from this configuration.
    #[must_use]
    pub const fn shopper_settings(&self) -> ShopperSettings {
        ShopperSettings {
            cart_reveal_delay: self.cart_reveal_delay,
            notification_duration: self.notification_duration,
            shipping: self.shipping,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a variable if set, otherwise return the default.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        None => Ok(default),
    }
}
