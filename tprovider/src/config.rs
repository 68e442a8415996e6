//! Value-typed provider configuration.
//!
//! A [`ProviderConfig`] is built in code, deserialized from whatever config
//! format the application uses, or read from the environment:
//!
//! | variable                        | meaning                               |
//! |---------------------------------|---------------------------------------|
//! | `TINYCHAIN_PROVIDER`            | `ollama` or `deepseek` (`from_env`)   |
//! | `TINYCHAIN_<PROVIDER>_ENDPOINT` | base URL override                     |
//! | `TINYCHAIN_<PROVIDER>_MODEL`    | default model override                |
//! | `OLLAMA_HOST`                   | Ollama base URL when no override set  |
//! | `DEEPSEEK_API_KEY`              | DeepSeek bearer token                 |
//!
//! ```rust
//! use std::time::Duration;
//!
//! use tprovider::{ProviderConfig, ProviderErrorKind, ProviderId};
//!
//! let config = ProviderConfig::ollama()
//!     .with_model("llama3")
//!     .with_timeout(Duration::from_secs(10));
//! assert!(config.validate().is_ok());
//! assert_eq!(config.resolved_endpoint(), "http://localhost:11434");
//!
//! let missing_key = ProviderConfig::new(ProviderId::DeepSeek);
//! assert_eq!(
//!     missing_key.validate().map_err(|e| e.kind),
//!     Err(ProviderErrorKind::Config)
//! );
//! ```

use std::time::Duration;

use serde::{Deserialize, Deserializer};
use tcommon::GenerationOptions;

use crate::{ProviderError, ProviderId, SecretString};

pub const OLLAMA_DEFAULT_ENDPOINT: &str = "http://localhost:11434";
pub const OLLAMA_DEFAULT_MODEL: &str = "qwen3:8b";
pub const DEEPSEEK_DEFAULT_ENDPOINT: &str = "https://api.deepseek.com";
pub const DEEPSEEK_DEFAULT_MODEL: &str = "deepseek-chat";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderId,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default, alias = "model")]
    pub default_model: Option<String>,
    #[serde(default, rename = "timeout_secs", deserialize_with = "deserialize_secs")]
    pub timeout: Option<Duration>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub max_concurrency: Option<usize>,
}

impl ProviderConfig {
    pub fn new(provider: ProviderId) -> Self {
        Self {
            provider,
            endpoint: None,
            api_key: None,
            default_model: None,
            timeout: None,
            temperature: None,
            max_tokens: None,
            max_concurrency: None,
        }
    }

    pub fn ollama() -> Self {
        Self::new(ProviderId::Ollama)
    }

    pub fn deepseek(api_key: impl Into<String>) -> Self {
        Self::new(ProviderId::DeepSeek).with_api_key(api_key)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key));
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }

    /// Reads the provider from `TINYCHAIN_PROVIDER` and the rest from the
    /// provider-specific variables.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    pub fn from_env_for(provider: ProviderId) -> Self {
        Self::from_env_for_with(provider, |key| std::env::var(key).ok())
    }

    pub fn from_env_with<F>(lookup: F) -> Result<Self, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = lookup("TINYCHAIN_PROVIDER")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ProviderError::config("TINYCHAIN_PROVIDER is not set"))?
            .parse::<ProviderId>()?;

        Ok(Self::from_env_for_with(provider, lookup))
    }

    pub fn from_env_for_with<F>(provider: ProviderId, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let prefix = format!("TINYCHAIN_{}", provider.as_str().to_ascii_uppercase());

        let mut config = Self::new(provider);
        config.endpoint = read(&format!("{prefix}_ENDPOINT"));
        config.default_model = read(&format!("{prefix}_MODEL"));

        match provider {
            ProviderId::Ollama => {
                if config.endpoint.is_none() {
                    config.endpoint = read("OLLAMA_HOST").map(normalize_host);
                }
            }
            ProviderId::DeepSeek => {
                config.api_key = read("DEEPSEEK_API_KEY").map(SecretString::new);
            }
        }

        config
    }

    pub fn resolved_endpoint(&self) -> &str {
        match self.endpoint.as_deref() {
            Some(endpoint) => endpoint,
            None => match self.provider {
                ProviderId::Ollama => OLLAMA_DEFAULT_ENDPOINT,
                ProviderId::DeepSeek => DEEPSEEK_DEFAULT_ENDPOINT,
            },
        }
    }

    pub fn resolved_model(&self) -> &str {
        match self.default_model.as_deref() {
            Some(model) => model,
            None => match self.provider {
                ProviderId::Ollama => OLLAMA_DEFAULT_MODEL,
                ProviderId::DeepSeek => DEEPSEEK_DEFAULT_MODEL,
            },
        }
    }

    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        let endpoint = self.resolved_endpoint();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(ProviderError::config(format!(
                "{} endpoint must be an http(s) URL, got '{endpoint}'",
                self.provider
            )));
        }

        if self.resolved_model().trim().is_empty() {
            return Err(ProviderError::config(format!(
                "{} model must not be empty",
                self.provider
            )));
        }

        if self.provider == ProviderId::DeepSeek
            && self.api_key.as_ref().is_none_or(SecretString::is_empty)
        {
            return Err(ProviderError::config(
                "deepseek requires an API key (set DEEPSEEK_API_KEY)",
            ));
        }

        if self.timeout.is_some_and(|timeout| timeout.is_zero()) {
            return Err(ProviderError::config("timeout must be greater than zero"));
        }

        Ok(())
    }
}

/// `OLLAMA_HOST` is commonly set without a scheme.
fn normalize_host(host: String) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host
    } else {
        format!("http://{host}")
    }
}

fn deserialize_secs<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
}
