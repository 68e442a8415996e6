//! Wiring helpers that attach the panic-safe tracing hooks.

use std::sync::Arc;

use tobserve::{SafeChainHooks, SafeProviderHooks, SafeToolHooks, TracingObservabilityHooks};

use crate::{
    Chain, ChainBuilder, DefaultToolRuntime, ModelProvider, ModelInvoker, ParserStage,
    PromptFormatter, ProviderConfig, ProviderError, ToolRegistry, ToolRuntime, TrimParser,
    build_provider_with_hooks,
};

pub fn traced_provider(config: &ProviderConfig) -> Result<Arc<dyn ModelProvider>, ProviderError> {
    build_provider_with_hooks(
        config,
        Arc::new(SafeProviderHooks::new(TracingObservabilityHooks)),
    )
}

pub fn traced_tool_runtime(registry: ToolRegistry) -> Arc<dyn ToolRuntime> {
    Arc::new(
        DefaultToolRuntime::new(Arc::new(registry))
            .with_hooks(Arc::new(SafeToolHooks::new(TracingObservabilityHooks))),
    )
}

pub fn traced_chain_builder() -> ChainBuilder {
    Chain::builder().hooks(Arc::new(SafeChainHooks::new(TracingObservabilityHooks)))
}

/// Template, then model, then whitespace trim.
pub fn prompt_chain(template: impl Into<String>, provider: Arc<dyn ModelProvider>) -> Chain {
    traced_chain_builder()
        .stage(PromptFormatter::from_template(template))
        .stage(ModelInvoker::new(provider))
        .stage(ParserStage::new(TrimParser))
        .build()
}
