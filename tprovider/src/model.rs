//! Provider-agnostic request, response, and message model types.
//!
//! ```rust
//! use tprovider::{ChatMessage, ChatRequest, ProviderErrorKind};
//!
//! let ok = ChatRequest::new_validated("qwen3:8b", vec![ChatMessage::user("Why is the sky blue?")]);
//! assert!(ok.is_ok());
//!
//! let err = ChatRequest::new_validated("", vec![ChatMessage::user("hi")])
//!     .err()
//!     .expect("empty model should fail");
//! assert_eq!(err.kind, ProviderErrorKind::InvalidRequest);
//! ```

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tcommon::GenerationOptions;

use crate::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Ollama,
    #[serde(alias = "deep-seek", alias = "deep_seek")]
    DeepSeek,
}

impl ProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::DeepSeek => "deepseek",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ProviderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ollama" | "local" => Ok(Self::Ollama),
            "deepseek" | "deep-seek" | "deep_seek" => Ok(Self::DeepSeek),
            other => Err(ProviderError::config(format!("unknown provider '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: Role,
    content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Parses a JSON array of `{"role", "content"}` objects.
    pub fn conversation_from_json(input: &str) -> Result<Vec<Self>, ProviderError> {
        serde_json::from_str(input).map_err(|err| {
            ProviderError::invalid_request(format!("conversation is not valid JSON: {err}"))
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinishReason {
    Stop,
    Length,
    #[default]
    Other,
}

impl FinishReason {
    pub(crate) fn parse(value: Option<&str>) -> Self {
        match value {
            Some("stop") => Self::Stop,
            Some("length") => Self::Length,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens.saturating_add(output_tokens),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub options: GenerationOptions,
    /// Reserved; requests are always sent non-streaming.
    pub stream: bool,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            options: GenerationOptions::default(),
            stream: false,
        }
    }

    pub fn new_validated(
        model: impl Into<String>,
        messages: Vec<ChatMessage>,
    ) -> Result<Self, ProviderError> {
        let request = Self::new(model, messages);
        request.validate()?;
        Ok(request)
    }

    /// Single-turn conversation holding one user message.
    pub fn single_turn(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self::new(model, vec![ChatMessage::user(prompt)])
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::invalid_request("model must not be empty"));
        }

        if self.messages.is_empty() {
            return Err(ProviderError::invalid_request(
                "at least one message is required",
            ));
        }

        if self.stream {
            return Err(ProviderError::invalid_request(
                "streaming responses are not supported",
            ));
        }

        if let Some(max_tokens) = self.options.max_tokens
            && max_tokens == 0
        {
            return Err(ProviderError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }

        if let Some(temperature) = self.options.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(ProviderError::invalid_request(
                "temperature must be in the inclusive range 0.0..=2.0",
            ));
        }

        Ok(())
    }
}

/// Backend reply, normalised just enough to be backend-agnostic.
///
/// `content` is `None` when the backend answered without a message at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderReply {
    pub model: Option<String>,
    pub content: Option<String>,
    pub finish_reason: FinishReason,
    pub usage: TokenUsage,
}

impl ProviderReply {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    pub content: String,
    pub model: Option<String>,
    pub finish_reason: FinishReason,
    pub usage: TokenUsage,
}

impl TryFrom<ProviderReply> for ChatResponse {
    type Error = ProviderError;

    /// Whitespace-only content counts as empty.
    fn try_from(value: ProviderReply) -> Result<Self, Self::Error> {
        let content = value
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProviderError::empty_response("backend returned no content"))?;

        Ok(Self {
            content,
            model: value.model,
            finish_reason: value.finish_reason,
            usage: value.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn single_turn_wraps_prompt_as_user_message() {
        let request = ChatRequest::single_turn("deepseek-chat", "hello");
        assert_eq!(request.messages, vec![ChatMessage::user("hello")]);
        assert!(!request.stream);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn validate_rejects_streaming_and_bad_options() {
        let mut request = ChatRequest::single_turn("m", "hi");
        request.stream = true;
        assert_eq!(
            request.validate().map_err(|e| e.kind),
            Err(ProviderErrorKind::InvalidRequest)
        );

        let request = ChatRequest::single_turn("m", "hi").with_max_tokens(0);
        assert!(request.validate().is_err());

        let request = ChatRequest::single_turn("m", "hi").with_temperature(3.5);
        assert!(request.validate().is_err());

        let request = ChatRequest::new("m", Vec::new());
        assert!(request.validate().is_err());
    }

    #[test]
    fn empty_or_blank_reply_is_an_empty_response_error() {
        let missing = ChatResponse::try_from(ProviderReply::empty()).expect_err("missing content");
        assert_eq!(missing.kind, ProviderErrorKind::EmptyResponse);

        let blank = ChatResponse::try_from(ProviderReply::text("  \n")).expect_err("blank content");
        assert_eq!(blank.kind, ProviderErrorKind::EmptyResponse);

        let ok = ChatResponse::try_from(ProviderReply::text(" hi ")).expect("content");
        assert_eq!(ok.content, " hi ");
    }

    #[test]
    fn provider_id_parses_aliases() {
        assert_eq!("Ollama".parse::<ProviderId>().ok(), Some(ProviderId::Ollama));
        assert_eq!("deep-seek".parse::<ProviderId>().ok(), Some(ProviderId::DeepSeek));
        assert!("openai".parse::<ProviderId>().is_err());
        assert_eq!(ProviderId::DeepSeek.to_string(), "deepseek");
    }

    #[test]
    fn conversation_parses_from_json_array() {
        let parsed = ChatMessage::conversation_from_json(
            r#"[{"role":"system","content":"be brief"},{"role":"user","content":"hi"}]"#,
        )
        .expect("valid conversation");
        assert_eq!(
            parsed,
            vec![ChatMessage::system("be brief"), ChatMessage::user("hi")]
        );

        let error = ChatMessage::conversation_from_json(r#"[{"role":"robot","content":"x"}]"#)
            .expect_err("unknown role");
        assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
    }

    #[test]
    fn token_usage_totals_saturate() {
        assert_eq!(TokenUsage::new(2, 3).total_tokens, 5);
        assert_eq!(TokenUsage::new(u32::MAX, 1).total_tokens, u32::MAX);
    }
}
