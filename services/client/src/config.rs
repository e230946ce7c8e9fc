//! services/client/src/config.rs
//!
//! Defines the client's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development. Command-line flags may override some values.

use code_explainer_core::domain::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use reqwest::Url;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub log_level: Level,
    pub page_size: u32,
    pub search_debounce: Duration,
    /// `None` leaves the transport's default in place.
    pub request_timeout: Option<Duration>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        // --- Backend Location ---
        let api_base_url = lookup("CODE_EXPLAINER_API_URL")
            .unwrap_or_else(|| "http://localhost:8000".to_string());
        validate_base_url(&api_base_url)?;

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "WARN".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        // --- History View Settings ---
        let page_size = match lookup("HISTORY_PAGE_SIZE") {
            Some(raw) => parse_page_size(&raw)?,
            None => DEFAULT_PAGE_SIZE,
        };

        let search_debounce = match lookup("SEARCH_DEBOUNCE_MS") {
            Some(raw) => Duration::from_millis(parse_number("SEARCH_DEBOUNCE_MS", &raw)?),
            None => Duration::from_millis(300),
        };

        let request_timeout = lookup("REQUEST_TIMEOUT_SECS")
            .map(|raw| parse_number("REQUEST_TIMEOUT_SECS", &raw).map(Duration::from_secs))
            .transpose()?;

        Ok(Self {
            api_base_url,
            log_level,
            page_size,
            search_debounce,
            request_timeout,
        })
    }
}

pub fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let url = Url::parse(raw).map_err(|e| {
        ConfigError::InvalidValue("CODE_EXPLAINER_API_URL".to_string(), e.to_string())
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidValue(
            "CODE_EXPLAINER_API_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}

fn parse_page_size(raw: &str) -> Result<u32, ConfigError> {
    let size: u32 = parse_number("HISTORY_PAGE_SIZE", raw)?;
    if size == 0 || size > MAX_PAGE_SIZE {
        return Err(ConfigError::InvalidValue(
            "HISTORY_PAGE_SIZE".to_string(),
            format!("must be between 1 and {}", MAX_PAGE_SIZE),
        ));
    }
    Ok(size)
}

fn parse_number<T: std::str::FromStr>(var: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| {
        ConfigError::InvalidValue(var.to_string(), format!("'{}' is not a number", raw))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.log_level, Level::WARN);
        assert_eq!(config.page_size, 12);
        assert_eq!(config.search_debounce, Duration::from_millis(300));
        assert!(config.request_timeout.is_none());
    }

    #[test]
    fn values_are_read_from_the_environment() {
        let config = config_from(&[
            ("CODE_EXPLAINER_API_URL", "https://explain.example.com/api"),
            ("RUST_LOG", "debug"),
            ("HISTORY_PAGE_SIZE", "24"),
            ("SEARCH_DEBOUNCE_MS", "150"),
            ("REQUEST_TIMEOUT_SECS", "30"),
        ])
        .unwrap();
        assert_eq!(config.api_base_url, "https://explain.example.com/api");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.page_size, 24);
        assert_eq!(config.search_debounce, Duration::from_millis(150));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn invalid_values_name_the_variable() {
        let err = config_from(&[("HISTORY_PAGE_SIZE", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref var, _) if var == "HISTORY_PAGE_SIZE"));

        let err = config_from(&[("CODE_EXPLAINER_API_URL", "ftp://example.com")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue(ref var, _) if var == "CODE_EXPLAINER_API_URL"
        ));

        assert!(config_from(&[("RUST_LOG", "chatty")]).is_err());
        assert!(config_from(&[("SEARCH_DEBOUNCE_MS", "soon")]).is_err());
    }
}
