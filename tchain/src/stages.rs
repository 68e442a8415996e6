//! Built-in stages: template formatting, model invocation and tool calls.

use std::sync::Arc;

use tcommon::{BoxFuture, CallContext};
use tprovider::{ChatMessage, ModelProvider};
use ttooling::{ToolCall, ToolExecutionContext, ToolRuntime};

use crate::{ChainError, PromptTemplate, Runnable};

/// Reads a JSON object of variables and renders the template with it.
#[derive(Debug, Clone)]
pub struct PromptFormatter {
    template: PromptTemplate,
}

impl PromptFormatter {
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }

    pub fn from_template(template: impl Into<String>) -> Self {
        Self::new(PromptTemplate::from_template(template))
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }
}

impl Runnable for PromptFormatter {
    fn name(&self) -> &str {
        "prompt_formatter"
    }

    fn invoke<'a>(
        &'a self,
        _ctx: &'a CallContext,
        input: String,
    ) -> BoxFuture<'a, Result<String, ChainError>> {
        let output = self.template.format_json(&input);
        Box::pin(async move { output })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelInput {
    /// The stage input is the user prompt of a single-turn conversation.
    #[default]
    Prompt,
    /// The stage input is a JSON array of `{"role", "content"}` messages.
    Conversation,
}

/// Sends the stage input to a model and passes the reply on.
#[derive(Clone)]
pub struct ModelInvoker {
    provider: Arc<dyn ModelProvider>,
    input: ModelInput,
}

impl ModelInvoker {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            input: ModelInput::Prompt,
        }
    }

    pub fn with_input(mut self, input: ModelInput) -> Self {
        self.input = input;
        self
    }
}

impl std::fmt::Debug for ModelInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelInvoker")
            .field("provider", &self.provider.id())
            .field("model", &self.provider.model())
            .field("input", &self.input)
            .finish()
    }
}

impl Runnable for ModelInvoker {
    fn name(&self) -> &str {
        "model_invoker"
    }

    fn invoke<'a>(
        &'a self,
        ctx: &'a CallContext,
        input: String,
    ) -> BoxFuture<'a, Result<String, ChainError>> {
        Box::pin(async move {
            let messages = match self.input {
                ModelInput::Prompt => vec![ChatMessage::user(input)],
                ModelInput::Conversation => ChatMessage::conversation_from_json(&input)
                    .map_err(|error| ChainError::template_parse(error.message))?,
            };

            let response = self.provider.chat(ctx, messages).await?;
            Ok(response.content)
        })
    }
}

/// Runs a named tool with the stage input as its JSON arguments. Every call
/// carries the same id, derived from the tool name.
#[derive(Clone)]
pub struct ToolInvoker {
    runtime: Arc<dyn ToolRuntime>,
    tool_name: String,
    stage_name: String,
    call_id: String,
}

impl ToolInvoker {
    pub fn new(runtime: Arc<dyn ToolRuntime>, tool_name: impl Into<String>) -> Self {
        let tool_name = tool_name.into();
        Self {
            runtime,
            stage_name: format!("tool:{tool_name}"),
            call_id: format!("{tool_name}-call"),
            tool_name,
        }
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }
}

impl std::fmt::Debug for ToolInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolInvoker")
            .field("tool_name", &self.tool_name)
            .finish_non_exhaustive()
    }
}

impl Runnable for ToolInvoker {
    fn name(&self) -> &str {
        &self.stage_name
    }

    fn invoke<'a>(
        &'a self,
        ctx: &'a CallContext,
        input: String,
    ) -> BoxFuture<'a, Result<String, ChainError>> {
        Box::pin(async move {
            let call = ToolCall::new(self.call_id.clone(), self.tool_name.clone(), input);

            let result = self
                .runtime
                .execute(call, ToolExecutionContext::new(ctx.clone()))
                .await?;
            Ok(result.output)
        })
    }
}
