use std::env;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::services::CheckoutPolicy;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub advisory_timeout: Duration,
    pub low_stock_threshold: u32,
    pub checkout_policy: CheckoutPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            gemini_api_key: None,
            gemini_model: DEFAULT_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            advisory_timeout: Duration::from_secs(15),
            low_stock_threshold: 5,
            checkout_policy: CheckoutPolicy::default(),
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = var("GEMINI_API_KEY").or_else(|| var("API_KEY"));

        Ok(Self {
            port: parse(&var, "PORT", defaults.port)?,
            gemini_api_key,
            gemini_model: var("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            gemini_base_url: var("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            advisory_timeout: parse_timeout(&var, "ADVISORY_TIMEOUT_SECS", defaults.advisory_timeout)?,
            low_stock_threshold: parse(&var, "LOW_STOCK_THRESHOLD", defaults.low_stock_threshold)?,
            checkout_policy: CheckoutPolicy {
                allow_oversell: parse_flag(&var, "ALLOW_OVERSELL", defaults.checkout_policy.allow_oversell)?,
                allow_unknown_products: parse_flag(
                    &var,
                    "ALLOW_UNKNOWN_PRODUCTS",
                    defaults.checkout_policy.allow_unknown_products,
                )?,
            },
        })
    }
}

fn parse<T, F>(var: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

// A zero timeout would fail every advisory call.
fn parse_timeout<F>(var: &F, key: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse(var, key, default.as_secs())? {
        0 => Err(ConfigError::Invalid {
            key,
            value: var(key).unwrap_or_default(),
        }),
        secs => Ok(Duration::from_secs(secs)),
    }
}

fn parse_flag<F>(var: &F, key: &'static str, default: bool) -> Result<bool, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}
