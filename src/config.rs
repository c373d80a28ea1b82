//! Client Configuration
//!
//! Endpoint, credential and model settings for [`WikiClient`](crate::client::WikiClient).

use std::fmt;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Result, WikiError};

/// Environment variable holding the chat-completions URL.
pub const ENV_API_URL: &str = "LLM_API_URL";
/// Environment variable holding the bearer credential.
pub const ENV_API_KEY: &str = "LLM_API_KEY";
/// Environment variable overriding the model identifier.
pub const ENV_MODEL: &str = "LLM_MODEL";

/// Streaming endpoint configuration.
#[derive(Clone)]
pub struct WikiConfig {
    /// Full URL of the chat completions endpoint
    pub endpoint: String,
    /// Bearer credential
    pub api_key: SecretString,
    /// Model identifier sent in every request
    pub model: String,
    /// System instruction sent ahead of the user message
    pub system_prompt: String,
    /// Connect timeout for the HTTP client
    pub connect_timeout: Duration,
}

impl WikiConfig {
    /// Default model identifier
    pub const DEFAULT_MODEL: &'static str = "deepseek-v3-2-251201";

    /// Default system instruction
    pub const DEFAULT_SYSTEM_PROMPT: &'static str = "你是一个专业的生物百科专家。";

    /// Default connect timeout
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a configuration for the given endpoint and key.
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: SecretString::from(api_key.into()),
            model: Self::DEFAULT_MODEL.to_string(),
            system_prompt: Self::DEFAULT_SYSTEM_PROMPT.to_string(),
            connect_timeout: Self::DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Read `LLM_API_URL`, `LLM_API_KEY` and the optional `LLM_MODEL`.
    pub fn from_env() -> Result<Self> {
        let endpoint = required_var(ENV_API_URL)?;
        let api_key = required_var(ENV_API_KEY)?;
        let mut config = Self::new(endpoint, api_key);
        if let Ok(model) = std::env::var(ENV_MODEL)
            && !model.trim().is_empty()
        {
            config.model = model;
        }
        Ok(config)
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the system instruction
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(WikiError::ConfigurationError(
                "API key cannot be empty".to_string(),
            ));
        }

        if self.endpoint.trim().is_empty() {
            return Err(WikiError::ConfigurationError(
                "Endpoint URL cannot be empty".to_string(),
            ));
        }

        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(WikiError::ConfigurationError(format!(
                "Endpoint URL must start with http:// or https://, got {}",
                self.endpoint
            )));
        }

        if self.model.trim().is_empty() {
            return Err(WikiError::ConfigurationError(
                "Model cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Debug for WikiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WikiConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("system_prompt", &self.system_prompt)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

fn required_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(WikiError::ConfigurationError(format!(
            "Environment variable {name} is not set"
        ))),
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WikiConfig::new("https://llm.example/v1/chat/completions", "key");
        assert_eq!(config.model, WikiConfig::DEFAULT_MODEL);
        assert_eq!(config.system_prompt, WikiConfig::DEFAULT_SYSTEM_PROMPT);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.api_key.expose_secret(), "key");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let config = WikiConfig::new("http://localhost:1", "key")
            .with_model("m")
            .with_system_prompt("be brief")
            .with_connect_timeout(Duration::from_secs(2));
        assert_eq!(config.model, "m");
        assert_eq!(config.system_prompt, "be brief");
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let empty_key = WikiConfig::new("http://localhost:1", " ");
        assert!(matches!(
            empty_key.validate(),
            Err(WikiError::ConfigurationError(_))
        ));

        let empty_url = WikiConfig::new("", "key");
        assert!(empty_url.validate().is_err());

        let bad_scheme = WikiConfig::new("ftp://host/x", "key");
        assert!(bad_scheme.validate().is_err());

        let empty_model = WikiConfig::new("http://localhost:1", "key").with_model("");
        assert!(empty_model.validate().is_err());
    }

    #[test]
    fn debug_redacts_key() {
        let config = WikiConfig::new("http://localhost:1", "sk-very-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("sk-very-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn from_env_reads_variables() {
        unsafe {
            std::env::set_var(ENV_API_URL, "http://localhost:9/v1/chat/completions");
            std::env::set_var(ENV_API_KEY, "env-key");
            std::env::set_var(ENV_MODEL, "env-model");
        }

        let config = WikiConfig::from_env().expect("config from env");
        assert_eq!(config.endpoint, "http://localhost:9/v1/chat/completions");
        assert_eq!(config.api_key.expose_secret(), "env-key");
        assert_eq!(config.model, "env-model");

        unsafe {
            std::env::remove_var(ENV_API_KEY);
        }
        assert!(matches!(
            WikiConfig::from_env(),
            Err(WikiError::ConfigurationError(_))
        ));

        unsafe {
            std::env::remove_var(ENV_API_URL);
            std::env::remove_var(ENV_MODEL);
        }
    }
}
