//! Client settings: defaults, serde loading and `FRONTAPP_*` environment
//! variables.
//!
//! # Design
//! Only the API key is mandatory. Everything else has a default that
//! matches the public Front API, so `ClientConfig::new(key)` is enough for
//! production use and tests override just the endpoint.

use std::time::Duration;

use serde::Deserialize;

use crate::error::ApiError;

pub const DEFAULT_ENDPOINT: &str = "https://api2.frontapp.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_USER_AGENT: &str = concat!("frontapp-core/", env!("CARGO_PKG_VERSION"));

/// Settings for a `FrontClient`.
///
/// Deserializable so it can live in a larger application config file;
/// only `api_key` is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Disabling peer verification exposes the bearer token to anyone able
    /// to intercept the connection.
    #[serde(default = "default_verify_ssl")]
    pub verify_ssl: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_verify_ssl() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: default_endpoint(),
            verify_ssl: default_verify_ssl(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }

    /// Read settings from `FRONTAPP_*` environment variables.
    ///
    /// `FRONTAPP_API_KEY` is required; `FRONTAPP_ENDPOINT`,
    /// `FRONTAPP_VERIFY_SSL` and `FRONTAPP_TIMEOUT_SECS` fall back to defaults.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let api_key = lookup("FRONTAPP_API_KEY").ok_or(ApiError::MissingApiKey)?;
        let mut config = Self::new(api_key);

        if let Some(endpoint) = lookup("FRONTAPP_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(raw) = lookup("FRONTAPP_VERIFY_SSL") {
            config.verify_ssl = parse_bool(&raw).ok_or_else(|| {
                ApiError::Config(format!("FRONTAPP_VERIFY_SSL: expected a boolean, got {raw:?}"))
            })?;
        }
        if let Some(raw) = lookup("FRONTAPP_TIMEOUT_SECS") {
            config.timeout_secs = raw.trim().parse().map_err(|e| {
                ApiError::Config(format!("FRONTAPP_TIMEOUT_SECS: {e}"))
            })?;
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
