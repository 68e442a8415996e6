//! Prompt templates and linear runnable chains.
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tchain::{Chain, ModelInvoker, ParserStage, PromptFormatter, TrimParser};
//! use tprovider::{
//!     ChatModel, ChatRequest, ProviderClient, ProviderError, ProviderFuture, ProviderId,
//!     ProviderReply,
//! };
//!
//! #[derive(Debug)]
//! struct Canned;
//!
//! impl ProviderClient for Canned {
//!     fn id(&self) -> ProviderId {
//!         ProviderId::Ollama
//!     }
//!
//!     fn default_model(&self) -> &str {
//!         "canned"
//!     }
//!
//!     fn chat<'a>(
//!         &'a self,
//!         _request: ChatRequest,
//!     ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>> {
//!         Box::pin(async { Ok(ProviderReply::text("  Why did the chicken cross the road?  ")) })
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let chain = Chain::builder()
//!     .stage(PromptFormatter::from_template("Tell me a {adjective} joke about {content}."))
//!     .stage(ModelInvoker::new(Arc::new(ChatModel::new(Arc::new(Canned)))))
//!     .stage(ParserStage::new(TrimParser))
//!     .build();
//!
//! let joke = chain
//!     .run(r#"{"adjective":"funny","content":"chickens"}"#)
//!     .await
//!     .expect("chain should run");
//! assert_eq!(joke, "Why did the chicken cross the road?");
//! # }
//! ```

mod chain;
mod error;
mod hooks;
mod parser;
mod runnable;
mod stages;
mod template;

pub mod prelude {
    pub use crate::{
        Chain, ChainBuilder, ChainError, ChainErrorKind, ChainRuntimeHooks, ChainState, FnStage,
        ModelInput, ModelInvoker, OutputParser, ParserStage, PromptFormatter, PromptTemplate,
        Runnable, ToolInvoker,
    };
}

pub use chain::{Chain, ChainBuilder, ChainState};
pub use error::{ChainError, ChainErrorKind};
pub use hooks::{ChainRuntimeHooks, NoopChainRuntimeHooks};
pub use parser::{
    JsonFieldParser, OutputParser, ParserStage, StripReasoningParser, TrimParser,
};
pub use runnable::{FnStage, Runnable};
pub use stages::{ModelInput, ModelInvoker, PromptFormatter, ToolInvoker};
pub use template::PromptTemplate;
