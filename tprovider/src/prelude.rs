//! Common `tprovider` imports for downstream crates.

pub use crate::{
    BatchDispatcher, BatchError, BatchFailure, BatchReport, ChatMessage, ChatModel,
    ChatModelBuilder, ChatRequest, ChatResponse, FinishReason, ModelProvider, NoopOperationHooks,
    ProviderClient, ProviderConfig, ProviderError, ProviderErrorKind, ProviderId,
    ProviderOperationHooks, ProviderRegistry, ProviderReply, Role, TokenUsage,
};
pub use tcommon::{BoxFuture, CallContext, GenerationOptions, MetadataMap};
