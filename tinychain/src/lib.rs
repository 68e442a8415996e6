//! Unified facade over the tinychain workspace crates.
//!
//! This crate is meant to be the single dependency for most applications. It
//! re-exports the workspace crates and adds provider construction from a
//! [`ProviderConfig`], tracing wiring helpers and a few macros.
//!
//! ```rust
//! use tinychain::{PromptTemplate, tc_messages};
//!
//! let prompt = PromptTemplate::from_template("Tell me a {adjective} joke about {content}.");
//! assert_eq!(prompt.input_variables(), ["adjective", "content"]);
//!
//! let text = prompt.format([("adjective", "funny"), ("content", "chickens")]);
//! let conversation = tc_messages![user => text];
//! assert_eq!(conversation[0].content(), "Tell me a funny joke about chickens.");
//! ```

mod macros;

pub mod prelude;
pub mod providers;
pub mod runtime;
pub mod util;

pub use tchain;
pub use tcommon;
pub use tobserve;
pub use tprovider;
pub use ttooling;

pub use tchain::{
    Chain, ChainBuilder, ChainError, ChainErrorKind, ChainRuntimeHooks, ChainState, FnStage,
    JsonFieldParser, ModelInput, ModelInvoker, NoopChainRuntimeHooks, OutputParser, ParserStage,
    PromptFormatter, PromptTemplate, Runnable, StripReasoningParser, ToolInvoker, TrimParser,
};
pub use tcommon::{BoxFuture, CallContext, CancellationToken, GenerationOptions, MetadataMap};
pub use tobserve::{
    MetricsObservabilityHooks, SafeChainHooks, SafeProviderHooks, SafeToolHooks,
    TracingObservabilityHooks,
};
pub use tprovider::{
    BatchDispatcher, BatchError, BatchFailure, BatchReport, ChatMessage, ChatModel,
    ChatModelBuilder, ChatRequest, ChatResponse, FinishReason, ModelProvider, NoopOperationHooks,
    ProviderClient, ProviderConfig, ProviderError, ProviderErrorKind, ProviderFuture, ProviderId,
    ProviderOperationHooks, ProviderRegistry, ProviderReply, Role, SecretString, TokenUsage,
};
pub use ttooling::{
    DefaultToolRuntime, FunctionTool, NoopToolRuntimeHooks, Tool, ToolCall, ToolDefinition,
    ToolError, ToolErrorKind, ToolExecutionContext, ToolExecutionResult, ToolFuture,
    ToolRegistry, ToolRuntime, ToolRuntimeHooks, parse_json_object, parse_json_value,
    parse_typed, required_string,
};

pub use providers::{
    DEFAULT_REQUEST_TIMEOUT, build_chat_model, build_client, build_provider_from_env,
    build_provider_with_config, build_provider_with_hooks, list_models,
};
pub use runtime::{prompt_chain, traced_chain_builder, traced_provider, traced_tool_runtime};
pub use util::{assistant_message, parse_provider_id, system_message, user_message};

#[cfg(test)]
mod tests {
    use crate::Role;

    #[test]
    fn tc_msg_macro_creates_expected_message() {
        let message = crate::tc_msg!(user => "hello");
        assert_eq!(message.role(), Role::User);
        assert_eq!(message.content(), "hello");
    }

    #[test]
    fn tc_messages_macro_builds_message_vector() {
        let messages = crate::tc_messages![
            system => "You are concise.",
            user => "Summarize the repo",
        ];

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role(), Role::System);
        assert_eq!(messages[1].role(), Role::User);
        assert!(crate::tc_messages![].is_empty());
    }

    #[tokio::test]
    async fn tc_chain_macro_runs_stages_in_order() {
        let chain = crate::tc_chain![
            crate::FnStage::new("a", |text| Ok(format!("{text}a"))),
            crate::FnStage::new("b", |text| Ok(format!("{text}b"))),
        ];
        assert_eq!(chain.run("").await.expect("chain"), "ab");
    }
}
