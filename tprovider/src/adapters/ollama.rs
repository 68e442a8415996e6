//! Ollama native chat client (`POST /api/chat`).

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::adapters::http::{endpoint, map_send_error, read_json};
use crate::config::{OLLAMA_DEFAULT_ENDPOINT, OLLAMA_DEFAULT_MODEL};
use crate::{
    ChatMessage, ChatRequest, FinishReason, ProviderClient, ProviderError, ProviderFuture,
    ProviderId, ProviderReply, TokenUsage,
};

#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    default_model: String,
}

impl OllamaClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: OLLAMA_DEFAULT_ENDPOINT.to_string(),
            default_model: OLLAMA_DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Names of the locally pulled models, sorted.
    pub async fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let response = self
            .client
            .get(endpoint(&self.base_url, "api/tags"))
            .send()
            .await
            .map_err(map_send_error)?;

        let parsed = read_json::<OllamaTagsResponse>(response).await?;
        let mut names = parsed
            .models
            .into_iter()
            .map(|tag| tag.name)
            .collect::<Vec<_>>();
        names.sort();
        Ok(names)
    }
}

impl ProviderClient for OllamaClient {
    fn id(&self) -> ProviderId {
        ProviderId::Ollama
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn chat<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>> {
        Box::pin(async move {
            let body = OllamaChatRequest::from(request);
            let response = self
                .client
                .post(endpoint(&self.base_url, "api/chat"))
                .json(&body)
                .send()
                .await
                .map_err(map_send_error)?;

            let parsed = read_json::<OllamaChatResponse>(response).await?;
            Ok(parsed.into())
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OllamaChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
}

#[derive(Debug, Serialize)]
pub(crate) struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl From<ChatRequest> for OllamaChatRequest {
    fn from(value: ChatRequest) -> Self {
        let options = (value.options.temperature.is_some() || value.options.max_tokens.is_some())
            .then_some(OllamaOptions {
                temperature: value.options.temperature,
                num_predict: value.options.max_tokens,
            });

        Self {
            model: value.model,
            messages: value.messages,
            stream: false,
            options,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OllamaChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    message: Option<OllamaResponseMessage>,
    #[serde(default)]
    done_reason: Option<String>,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OllamaResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl From<OllamaChatResponse> for ProviderReply {
    fn from(value: OllamaChatResponse) -> Self {
        Self {
            model: value.model,
            content: value.message.and_then(|message| message.content),
            finish_reason: FinishReason::parse(value.done_reason.as_deref()),
            usage: TokenUsage::new(
                value.prompt_eval_count.unwrap_or_default(),
                value.eval_count.unwrap_or_default(),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OllamaTagsResponse {
    #[serde(default)]
    models: Vec<OllamaModelTag>,
}

#[derive(Debug, Deserialize)]
struct OllamaModelTag {
    name: String,
}
