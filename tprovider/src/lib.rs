//! Provider abstraction and concurrent batch dispatch.
//!
//! A [`ProviderClient`] moves one chat request to a concrete backend. A
//! [`ChatModel`] wraps a client with a model name and default options and
//! implements the uniform [`ModelProvider`] contract: `call` for one prompt,
//! `generate` for many prompts fanned out through a [`BatchDispatcher`].
//!
//! ```rust
//! use tprovider::{ChatMessage, ChatRequest, ProviderConfig, ProviderId};
//!
//! let config = ProviderConfig::ollama();
//! assert_eq!(config.provider, ProviderId::Ollama);
//!
//! let request = ChatRequest::single_turn(config.resolved_model(), "hello");
//! assert_eq!(request.messages, vec![ChatMessage::user("hello")]);
//! ```

pub mod adapters;
pub mod prelude;

mod batch;
mod client;
mod config;
mod credentials;
mod error;
mod hooks;
mod model;
mod provider;
mod registry;

pub use batch::{BatchDispatcher, BatchReport};
pub use client::{ProviderClient, ProviderFuture};
pub use config::{
    DEEPSEEK_DEFAULT_ENDPOINT, DEEPSEEK_DEFAULT_MODEL, OLLAMA_DEFAULT_ENDPOINT,
    OLLAMA_DEFAULT_MODEL, ProviderConfig,
};
pub use credentials::SecretString;
pub use error::{BatchError, BatchFailure, ProviderError, ProviderErrorKind};
pub use hooks::{NoopOperationHooks, ProviderOperationHooks};
pub use model::{
    ChatMessage, ChatRequest, ChatResponse, FinishReason, ProviderId, ProviderReply, Role,
    TokenUsage,
};
pub use provider::{ChatModel, ChatModelBuilder, ModelProvider};
pub use registry::ProviderRegistry;
