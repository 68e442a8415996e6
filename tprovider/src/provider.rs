//! Uniform model contract and the client-backed [`ChatModel`].
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use tprovider::{
//!     ChatModel, ChatRequest, ModelProvider, ProviderClient, ProviderError, ProviderFuture,
//!     ProviderId, ProviderReply,
//! };
//!
//! #[derive(Debug)]
//! struct Echo;
//!
//! impl ProviderClient for Echo {
//!     fn id(&self) -> ProviderId {
//!         ProviderId::Ollama
//!     }
//!
//!     fn default_model(&self) -> &str {
//!         "echo"
//!     }
//!
//!     fn chat<'a>(
//!         &'a self,
//!         request: ChatRequest,
//!     ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>> {
//!         Box::pin(async move {
//!             let last = request.messages.last().map(|m| m.content().to_string());
//!             Ok(ProviderReply { content: last, ..ProviderReply::default() })
//!         })
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let model = ChatModel::new(Arc::new(Echo));
//! assert_eq!(model.call("ping").await.expect("call"), "ping");
//! # }
//! ```

use std::sync::Arc;
use std::time::Instant;

use tcommon::{CallContext, GenerationOptions};

use crate::{
    BatchDispatcher, BatchError, BatchReport, ChatMessage, ChatRequest, ChatResponse,
    NoopOperationHooks, ProviderClient, ProviderError, ProviderFuture, ProviderId,
    ProviderOperationHooks,
};

pub trait ModelProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn model(&self) -> &str;

    /// Sends a whole conversation and returns the non-empty reply.
    fn chat<'a>(
        &'a self,
        ctx: &'a CallContext,
        messages: Vec<ChatMessage>,
    ) -> ProviderFuture<'a, Result<ChatResponse, ProviderError>>;

    fn call_with<'a>(
        &'a self,
        ctx: &'a CallContext,
        prompt: &'a str,
    ) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            let response = self.chat(ctx, vec![ChatMessage::user(prompt)]).await?;
            Ok(response.content)
        })
    }

    fn call<'a>(&'a self, prompt: &'a str) -> ProviderFuture<'a, Result<String, ProviderError>> {
        Box::pin(async move {
            let ctx = CallContext::new();
            self.call_with(&ctx, prompt).await
        })
    }

    /// Runs every prompt concurrently; `outputs[i]` answers `prompts[i]`.
    fn generate_with<'a>(
        &'a self,
        ctx: &'a CallContext,
        prompts: Vec<String>,
    ) -> ProviderFuture<'a, Result<Vec<String>, BatchError>>;

    fn generate<'a>(
        &'a self,
        prompts: Vec<String>,
    ) -> ProviderFuture<'a, Result<Vec<String>, BatchError>> {
        Box::pin(async move {
            let ctx = CallContext::new();
            self.generate_with(&ctx, prompts).await
        })
    }
}

#[derive(Clone)]
pub struct ChatModel {
    client: Arc<dyn ProviderClient>,
    model: String,
    options: GenerationOptions,
    dispatcher: BatchDispatcher,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl std::fmt::Debug for ChatModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatModel")
            .field("client", &self.client)
            .field("model", &self.model)
            .field("options", &self.options)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

impl ChatModel {
    /// Model bound to the client's default model name.
    ///
    /// Performs no checks: a client with a blank default model only fails
    /// once a call is made. Use [`ChatModel::try_new`] or the builder to
    /// reject it up front.
    pub fn new(client: Arc<dyn ProviderClient>) -> Self {
        let model = client.default_model().to_string();
        Self {
            client,
            model,
            options: GenerationOptions::default(),
            dispatcher: BatchDispatcher::default(),
            hooks: Arc::new(NoopOperationHooks),
        }
    }

    /// Like [`ChatModel::new`], with the builder's validation.
    pub fn try_new(client: Arc<dyn ProviderClient>) -> Result<Self, ProviderError> {
        Self::builder(client).build()
    }

    pub fn builder(client: Arc<dyn ProviderClient>) -> ChatModelBuilder {
        ChatModelBuilder::new(client)
    }

    pub fn options(&self) -> GenerationOptions {
        self.options
    }

    pub fn dispatcher(&self) -> BatchDispatcher {
        self.dispatcher
    }

    /// Like [`ModelProvider::generate_with`] but keeps partial results.
    pub async fn generate_settled(&self, ctx: &CallContext, prompts: Vec<String>) -> BatchReport {
        let size = prompts.len();
        let started = Instant::now();
        self.hooks.on_batch_start(self.id(), &self.model, size);

        let model = self.clone();
        let report = self
            .dispatcher
            .dispatch_settled(ctx, prompts, move |ctx, prompt| {
                let model = model.clone();
                async move { model.call_with(&ctx, &prompt).await }
            })
            .await;

        self.hooks.on_batch_complete(
            self.id(),
            &self.model,
            size,
            report.failures().len(),
            started.elapsed(),
        );
        report
    }

    async fn send(
        &self,
        ctx: &CallContext,
        messages: Vec<ChatMessage>,
    ) -> Result<ChatResponse, ProviderError> {
        let request = ChatRequest::new(self.model.clone(), messages).with_options(self.options);
        request.validate()?;

        let reply = ctx.guard(self.client.chat(request)).await??;
        ChatResponse::try_from(reply)
    }
}

impl ModelProvider for ChatModel {
    fn id(&self) -> ProviderId {
        self.client.id()
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn chat<'a>(
        &'a self,
        ctx: &'a CallContext,
        messages: Vec<ChatMessage>,
    ) -> ProviderFuture<'a, Result<ChatResponse, ProviderError>> {
        Box::pin(async move {
            let started = Instant::now();
            self.hooks.on_call_start(self.id(), &self.model);

            let outcome = self.send(ctx, messages).await;
            match &outcome {
                Ok(_) => self
                    .hooks
                    .on_call_success(self.id(), &self.model, started.elapsed()),
                Err(error) => {
                    self.hooks
                        .on_call_failure(self.id(), &self.model, error, started.elapsed())
                }
            }
            outcome
        })
    }

    fn generate_with<'a>(
        &'a self,
        ctx: &'a CallContext,
        prompts: Vec<String>,
    ) -> ProviderFuture<'a, Result<Vec<String>, BatchError>> {
        Box::pin(async move { self.generate_settled(ctx, prompts).await.into_result() })
    }
}

pub struct ChatModelBuilder {
    client: Arc<dyn ProviderClient>,
    model: Option<String>,
    options: GenerationOptions,
    dispatcher: BatchDispatcher,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl ChatModelBuilder {
    pub fn new(client: Arc<dyn ProviderClient>) -> Self {
        Self {
            client,
            model: None,
            options: GenerationOptions::default(),
            dispatcher: BatchDispatcher::default(),
            hooks: Arc::new(NoopOperationHooks),
        }
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    pub fn max_concurrency(mut self, limit: usize) -> Self {
        self.dispatcher = self.dispatcher.with_max_concurrency(limit);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn build(self) -> Result<ChatModel, ProviderError> {
        let model = self
            .model
            .unwrap_or_else(|| self.client.default_model().to_string());
        if model.trim().is_empty() {
            return Err(ProviderError::config("model name must not be empty"));
        }

        // Surface bad defaults at construction instead of on the first call.
        ChatRequest::single_turn(model.as_str(), "ping")
            .with_options(self.options)
            .validate()
            .map_err(|error| ProviderError::config(error.message))?;

        Ok(ChatModel {
            client: self.client,
            model,
            options: self.options,
            dispatcher: self.dispatcher,
            hooks: self.hooks,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::{ProviderErrorKind, ProviderReply};

    #[derive(Debug, Default)]
    struct RecordingClient {
        requests: Mutex<Vec<ChatRequest>>,
    }

    impl ProviderClient for RecordingClient {
        fn id(&self) -> ProviderId {
            ProviderId::DeepSeek
        }

        fn default_model(&self) -> &str {
            "deepseek-chat"
        }

        fn chat<'a>(
            &'a self,
            request: ChatRequest,
        ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>> {
            Box::pin(async move {
                let content = request
                    .messages
                    .last()
                    .map(|message| format!("re: {}", message.content()));
                self.requests.lock().expect("requests lock").push(request);
                Ok(ProviderReply {
                    content,
                    ..ProviderReply::default()
                })
            })
        }
    }

    #[derive(Default)]
    struct RecordingHooks {
        events: Mutex<Vec<String>>,
    }

    impl ProviderOperationHooks for RecordingHooks {
        fn on_call_start(&self, provider: ProviderId, model: &str) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("start:{provider}:{model}"));
        }

        fn on_call_success(&self, _provider: ProviderId, _model: &str, _elapsed: Duration) {
            self.events
                .lock()
                .expect("events lock")
                .push("success".to_string());
        }

        fn on_call_failure(
            &self,
            _provider: ProviderId,
            _model: &str,
            error: &ProviderError,
            _elapsed: Duration,
        ) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("failure:{:?}", error.kind));
        }

        fn on_batch_start(&self, _provider: ProviderId, _model: &str, size: usize) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("batch_start:{size}"));
        }

        fn on_batch_complete(
            &self,
            _provider: ProviderId,
            _model: &str,
            size: usize,
            failures: usize,
            _elapsed: Duration,
        ) {
            self.events
                .lock()
                .expect("events lock")
                .push(format!("batch_complete:{size}:{failures}"));
        }
    }

    #[tokio::test]
    async fn call_sends_single_user_turn_with_default_options() {
        let client = Arc::new(RecordingClient::default());
        let model = ChatModel::builder(client.clone())
            .temperature(0.2)
            .build()
            .expect("model should build");

        let output = model.call("hello").await.expect("call should succeed");
        assert_eq!(output, "re: hello");

        let requests = client.requests.lock().expect("requests lock");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "deepseek-chat");
        assert_eq!(requests[0].messages, vec![ChatMessage::user("hello")]);
        assert_eq!(requests[0].options.temperature, Some(0.2));
        assert!(!requests[0].stream);
    }

    #[tokio::test]
    async fn hooks_observe_calls_and_batches() {
        let hooks = Arc::new(RecordingHooks::default());
        let model = ChatModel::builder(Arc::new(RecordingClient::default()))
            .model("deepseek-reasoner")
            .hooks(hooks.clone())
            .build()
            .expect("model should build");

        model.call("one").await.expect("call should succeed");
        model
            .generate(vec!["a".to_string()])
            .await
            .expect("batch should succeed");

        let events = hooks.events.lock().expect("events lock").clone();
        assert_eq!(events[0], "start:deepseek:deepseek-reasoner");
        assert_eq!(events[1], "success");
        assert_eq!(events[2], "batch_start:1");
        assert_eq!(events.last().map(String::as_str), Some("batch_complete:1:0"));
    }

    #[tokio::test]
    async fn invalid_defaults_are_rejected_at_build_time() {
        let error = ChatModel::builder(Arc::new(RecordingClient::default()))
            .max_tokens(0)
            .build()
            .expect_err("zero max_tokens should fail");
        assert_eq!(error.kind, ProviderErrorKind::Config);

        let error = ChatModel::builder(Arc::new(RecordingClient::default()))
            .model("  ")
            .build()
            .expect_err("blank model should fail");
        assert_eq!(error.kind, ProviderErrorKind::Config);
    }

    #[derive(Debug)]
    struct UnnamedModelClient;

    impl ProviderClient for UnnamedModelClient {
        fn id(&self) -> ProviderId {
            ProviderId::Ollama
        }

        fn default_model(&self) -> &str {
            ""
        }

        fn chat<'a>(
            &'a self,
            _request: ChatRequest,
        ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>> {
            Box::pin(async { Ok(ProviderReply::text("unreachable")) })
        }
    }

    #[tokio::test]
    async fn blank_default_model_is_rejected_by_try_new_and_builder() {
        let error = ChatModel::try_new(Arc::new(UnnamedModelClient))
            .expect_err("blank default model should fail");
        assert_eq!(error.kind, ProviderErrorKind::Config);

        let error = ChatModel::builder(Arc::new(UnnamedModelClient))
            .build()
            .expect_err("blank default model should fail");
        assert_eq!(error.kind, ProviderErrorKind::Config);

        let unchecked = ChatModel::new(Arc::new(UnnamedModelClient));
        let error = unchecked.call("hello").await.expect_err("call should fail");
        assert_eq!(error.kind, ProviderErrorKind::InvalidRequest);
    }

    #[tokio::test]
    async fn cancelled_context_short_circuits_call() {
        let client = Arc::new(RecordingClient::default());
        let model = ChatModel::new(client.clone());
        let ctx = CallContext::new();
        ctx.cancel();

        let error = model
            .call_with(&ctx, "never sent")
            .await
            .expect_err("call should be cancelled");
        assert_eq!(error.kind, ProviderErrorKind::Cancelled);
        assert!(client.requests.lock().expect("requests lock").is_empty());
    }
}
