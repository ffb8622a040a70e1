use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::application::checkout::CheckoutSettings;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub gateway_key_id: String,
    pub currency: String,
    pub http_timeout: Duration,
    pub payment_timeout: Duration,
}

impl Config {
    /// Reads the process environment (after loading `.env`, if present).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        Ok(Self {
            api_url: var("STOREFRONT_API_URL", "http://localhost:8080/api"),
            data_dir: PathBuf::from(var("STOREFRONT_DATA_DIR", ".storefront")),
            gateway_key_id: var("RAZORPAY_KEY_ID", "rzp_test_xxxxx"),
            currency: var("STOREFRONT_CURRENCY", "INR"),
            http_timeout: seconds(
                "STOREFRONT_HTTP_TIMEOUT_SECS",
                lookup("STOREFRONT_HTTP_TIMEOUT_SECS"),
                30,
            )?,
            payment_timeout: seconds(
                "STOREFRONT_PAYMENT_TIMEOUT_SECS",
                lookup("STOREFRONT_PAYMENT_TIMEOUT_SECS"),
                900,
            )?,
        })
    }

    pub fn checkout_settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            gateway_key_id: self.gateway_key_id.clone(),
            currency: self.currency.clone(),
            payment_timeout: self.payment_timeout,
            ..CheckoutSettings::default()
        }
    }
}

fn seconds(name: &'static str, raw: Option<String>, default: u64) -> Result<Duration, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(default));
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "a positive number of seconds",
            value: raw,
        }),
    }
}
