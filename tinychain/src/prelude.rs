//! Common imports for most tinychain applications.

pub use crate::{
    assistant_message, build_chat_model, build_client, build_provider_from_env,
    build_provider_with_config, build_provider_with_hooks, list_models, parse_provider_id,
    prompt_chain, system_message, traced_chain_builder, traced_provider, traced_tool_runtime,
    user_message,
};
pub use crate::{tc_chain, tc_messages, tc_msg};
pub use crate::{
    BatchDispatcher, BatchError, BatchReport, CallContext, Chain, ChainBuilder, ChainError,
    ChainErrorKind, ChatMessage, ChatModel, FnStage, ModelInput, ModelInvoker, ModelProvider,
    OutputParser, ParserStage, PromptFormatter, PromptTemplate, ProviderConfig, ProviderError,
    ProviderErrorKind, ProviderId, Role, Runnable, ToolDefinition, ToolError, ToolInvoker,
    ToolRegistry, ToolRuntime,
};
