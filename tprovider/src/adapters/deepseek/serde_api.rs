//! DeepSeek HTTP payloads and conversions.

use serde::{Deserialize, Serialize};

use crate::{ChatMessage, ChatRequest, FinishReason, ProviderReply, TokenUsage};

#[derive(Debug, Serialize)]
pub(crate) struct DeepSeekApiRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl From<ChatRequest> for DeepSeekApiRequest {
    fn from(value: ChatRequest) -> Self {
        Self {
            model: value.model,
            messages: value.messages,
            stream: false,
            temperature: value.options.temperature,
            max_tokens: value.options.max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeepSeekApiResponse {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<DeepSeekApiChoice>,
    #[serde(default)]
    pub usage: Option<DeepSeekApiUsage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeepSeekApiChoice {
    pub message: DeepSeekApiMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeepSeekApiMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeepSeekApiUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl From<DeepSeekApiResponse> for ProviderReply {
    /// Only the first choice is used; no choices means no content.
    fn from(value: DeepSeekApiResponse) -> Self {
        let (content, finish_reason) = match value.choices.into_iter().next() {
            Some(choice) => (
                choice.message.content,
                FinishReason::parse(choice.finish_reason.as_deref()),
            ),
            None => (None, FinishReason::Other),
        };

        let usage = value
            .usage
            .map(|usage| TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            })
            .unwrap_or_default();

        Self {
            model: value.model,
            content,
            finish_reason,
            usage,
        }
    }
}
