//! Configuration management for the authentication adapter
//!
//! Translates between the adapter's internal username/password/real-name/email
//! vocabulary and the field names the remote endpoint actually speaks. Loaded
//! once at startup and never mutated afterwards.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Complete adapter configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// URL the credential POST is sent to
    pub endpoint_url: String,

    /// Request timeout in seconds, enforced by the HTTP client
    /// Environment: WIKI_AUTH_TIMEOUT_SECS
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Shape of the outbound request body
    #[serde(default)]
    pub request: RequestMapping,

    /// Shape of the inbound response body
    #[serde(default)]
    pub response: ResponseMapping,
}

/// Field names for the outbound credential body
///
/// With a base key set the body is `{base_key: {username_key, password_key}}`,
/// otherwise the two credential keys sit at the top level.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RequestMapping {
    /// Optional wrapper key, empty means no nesting
    pub base_key: String,
    pub username_key: String,
    pub password_key: String,
}

/// Field names read from the response body
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ResponseMapping {
    /// Optional wrapper key, empty means no unwrapping
    pub base_key: String,
    pub username_key: String,
    pub real_name_key: String,
    pub email_key: String,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for RequestMapping {
    fn default() -> Self {
        Self {
            base_key: String::new(),
            username_key: "username".to_string(),
            password_key: "password".to_string(),
        }
    }
}

impl Default for ResponseMapping {
    fn default() -> Self {
        Self {
            base_key: String::new(),
            username_key: "username".to_string(),
            real_name_key: "real_name".to_string(),
            email_key: "email".to_string(),
        }
    }
}

impl AuthConfig {
    /// Load configuration from config.toml with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        // Try production path first, then development path
        Self::load_from(&["wiki-json-auth/config", "config"])
    }

    /// Load configuration from the first path that yields a valid config
    pub fn load_from(config_paths: &[&str]) -> Result<Self, ConfigError> {
        let mut last_error = None;

        for config_path in config_paths {
            match Config::builder()
                .add_source(File::with_name(config_path))
                .add_source(Environment::with_prefix("WIKI_AUTH").separator("__"))
                .build()
            {
                Ok(settings) => {
                    let config: AuthConfig = settings.try_deserialize()?;
                    config.validate()?;
                    return Ok(config);
                }
                Err(e) => {
                    last_error = Some(e);
                    continue;
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ConfigError::Message(format!("no configuration found in {config_paths:?}"))
        }))
    }

    /// Validation for all configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint_url.is_empty() {
            return Err(ConfigError::Message("endpoint_url cannot be empty".into()));
        }

        if reqwest::Url::parse(&self.endpoint_url).is_err() {
            return Err(ConfigError::Message(format!(
                "endpoint_url is not a valid URL: {}",
                self.endpoint_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.request.username_key.is_empty() || self.request.password_key.is_empty() {
            return Err(ConfigError::Message(
                "request username_key and password_key cannot be empty".into(),
            ));
        }

        if self.response.username_key.is_empty()
            || self.response.real_name_key.is_empty()
            || self.response.email_key.is_empty()
        {
            return Err(ConfigError::Message(
                "response username_key, real_name_key and email_key cannot be empty".into(),
            ));
        }

        Ok(())
    }

    /// Get the request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl RequestMapping {
    /// Get the wrapper key, when one is configured
    pub fn base(&self) -> Option<&str> {
        if self.base_key.is_empty() {
            None
        } else {
            Some(&self.base_key)
        }
    }
}

impl ResponseMapping {
    /// Get the wrapper key, when one is configured
    pub fn base(&self) -> Option<&str> {
        if self.base_key.is_empty() {
            None
        } else {
            Some(&self.base_key)
        }
    }
}
