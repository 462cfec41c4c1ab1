use std::env;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::errors::{ConfigError, UsageDashError};

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_PAGE_SIZE: u32 = 50;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime environment used by the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    fn from_str(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

/// Client configuration, read once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api_url: String,
    pub environment: Environment,
    pub log_level: String,
    pub debounce: Duration,
    pub page_size: u32,
    pub request_timeout: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            environment: Environment::Development,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl DashboardConfig {
    /// Loads configuration from the process environment (`USAGEDASH_*`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_env_with_prefix("USAGEDASH_")
    }

    /// Loads configuration from env vars prefixed with the provided value.
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        let key = |suffix: &str| format!("{}{}", prefix, suffix);

        let api_url = env::var(key("API_URL")).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Url::parse(&api_url).map_err(|source| ConfigError::InvalidUrl {
            url: api_url.clone(),
            source,
        })?;

        let environment = env::var(key("ENV"))
            .map(|raw| Environment::from_str(&raw))
            .unwrap_or_default();
        let log_level = env::var(key("LOG")).unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());

        let debounce_ms = read_number(&key("DEBOUNCE_MS"), DEFAULT_DEBOUNCE_MS)?;
        let page_size = read_number(&key("PAGE_SIZE"), DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: key("PAGE_SIZE"),
                value: "0".into(),
                reason: "page size must be positive".into(),
            });
        }
        let timeout_secs = read_number(&key("TIMEOUT_SECS"), DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            api_url,
            environment,
            log_level,
            debounce: Duration::from_millis(debounce_ms),
            page_size,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Overrides the API url, e.g. from a command line flag.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

fn read_number<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.clone(),
                reason: err.to_string(),
            }),
        Err(_) => Ok(default),
    }
}

/// Helper that loads config and converts to the canonical error type.
pub fn load_dashboard_config() -> Result<DashboardConfig, UsageDashError> {
    Ok(DashboardConfig::from_env()?)
}
