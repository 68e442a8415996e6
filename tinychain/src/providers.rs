//! Stable provider construction surface for facade consumers.
//!
//! ```rust
//! use tinychain::{ProviderConfig, ProviderErrorKind, build_client};
//!
//! let error = build_client(&ProviderConfig::deepseek("   "))
//!     .expect_err("blank key is rejected");
//! assert_eq!(error.kind, ProviderErrorKind::Config);
//! ```

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::{
    ChatModel, ModelProvider, NoopOperationHooks, ProviderClient, ProviderConfig, ProviderError,
    ProviderId, ProviderOperationHooks,
};

/// Request timeout used when the config does not set one.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Validates `config` and builds the matching transport client.
pub fn build_client(config: &ProviderConfig) -> Result<Arc<dyn ProviderClient>, ProviderError> {
    config.validate()?;

    let http = Client::builder()
        .timeout(config.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
        .build()
        .map_err(|err| ProviderError::config(format!("cannot build HTTP client: {err}")))?;

    match config.provider {
        ProviderId::Ollama => build_ollama_client(config, http),
        ProviderId::DeepSeek => build_deepseek_client(config, http),
    }
}

pub fn build_chat_model(
    config: &ProviderConfig,
    hooks: Arc<dyn ProviderOperationHooks>,
) -> Result<ChatModel, ProviderError> {
    let client = build_client(config)?;
    let mut builder = ChatModel::builder(client)
        .model(config.resolved_model())
        .options(config.options())
        .hooks(hooks);
    if let Some(limit) = config.max_concurrency {
        builder = builder.max_concurrency(limit);
    }
    builder.build()
}

pub fn build_provider_with_config(
    config: &ProviderConfig,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    build_provider_with_hooks(config, Arc::new(NoopOperationHooks))
}

pub fn build_provider_with_hooks(
    config: &ProviderConfig,
    hooks: Arc<dyn ProviderOperationHooks>,
) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    Ok(Arc::new(build_chat_model(config, hooks)?))
}

/// Reads the config from the environment (see [`ProviderConfig::from_env`]).
pub fn build_provider_from_env() -> Result<Arc<dyn ModelProvider>, ProviderError> {
    build_provider_with_config(&ProviderConfig::from_env()?)
}

/// Lists models the backend can serve. Only Ollama exposes a listing.
pub async fn list_models(config: &ProviderConfig) -> Result<Vec<String>, ProviderError> {
    config.validate()?;
    match config.provider {
        ProviderId::Ollama => list_ollama_models(config).await,
        ProviderId::DeepSeek => Err(ProviderError::invalid_request(
            "model listing is supported for ollama only",
        )),
    }
}

#[cfg(feature = "provider-ollama")]
fn ollama_client(config: &ProviderConfig, http: Client) -> tprovider::adapters::ollama::OllamaClient {
    tprovider::adapters::ollama::OllamaClient::new(http)
        .with_base_url(config.resolved_endpoint())
        .with_default_model(config.resolved_model())
}

#[cfg(feature = "provider-ollama")]
fn build_ollama_client(
    config: &ProviderConfig,
    http: Client,
) -> Result<Arc<dyn ProviderClient>, ProviderError> {
    Ok(Arc::new(ollama_client(config, http)))
}

#[cfg(not(feature = "provider-ollama"))]
fn build_ollama_client(
    _config: &ProviderConfig,
    _http: Client,
) -> Result<Arc<dyn ProviderClient>, ProviderError> {
    Err(ProviderError::config(
        "provider-ollama feature is not enabled on tinychain",
    ))
}

#[cfg(feature = "provider-ollama")]
async fn list_ollama_models(config: &ProviderConfig) -> Result<Vec<String>, ProviderError> {
    let http = Client::builder()
        .timeout(config.timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
        .build()
        .map_err(|err| ProviderError::config(format!("cannot build HTTP client: {err}")))?;
    ollama_client(config, http).list_models().await
}

#[cfg(not(feature = "provider-ollama"))]
async fn list_ollama_models(_config: &ProviderConfig) -> Result<Vec<String>, ProviderError> {
    Err(ProviderError::config(
        "provider-ollama feature is not enabled on tinychain",
    ))
}

#[cfg(feature = "provider-deepseek")]
fn build_deepseek_client(
    config: &ProviderConfig,
    http: Client,
) -> Result<Arc<dyn ProviderClient>, ProviderError> {
    let api_key = config
        .api_key
        .clone()
        .ok_or_else(|| ProviderError::config("deepseek requires an API key"))?;
    let client = tprovider::adapters::deepseek::DeepSeekClient::new(http, api_key)?
        .with_base_url(config.resolved_endpoint())
        .with_default_model(config.resolved_model());
    Ok(Arc::new(client))
}

#[cfg(not(feature = "provider-deepseek"))]
fn build_deepseek_client(
    _config: &ProviderConfig,
    _http: Client,
) -> Result<Arc<dyn ProviderClient>, ProviderError> {
    Err(ProviderError::config(
        "provider-deepseek feature is not enabled on tinychain",
    ))
}
