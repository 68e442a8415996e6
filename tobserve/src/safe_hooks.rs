//! Wrappers that keep a panicking hook from unwinding into the runtime.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use tchain::{ChainError, ChainRuntimeHooks, ChainState};
use tprovider::{ProviderError, ProviderId, ProviderOperationHooks};
use ttooling::{ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_call_start(&self, provider: ProviderId, model: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_call_start(provider, model)
        }));
    }

    fn on_call_success(&self, provider: ProviderId, model: &str, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_call_success(provider, model, elapsed)
        }));
    }

    fn on_call_failure(
        &self,
        provider: ProviderId,
        model: &str,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_call_failure(provider, model, error, elapsed)
        }));
    }

    fn on_batch_start(&self, provider: ProviderId, model: &str, size: usize) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_batch_start(provider, model, size)
        }));
    }

    fn on_batch_complete(
        &self,
        provider: ProviderId,
        model: &str,
        size: usize,
        failures: usize,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_batch_complete(provider, model, size, failures, elapsed)
        }));
    }
}

pub struct SafeChainHooks<H> {
    inner: H,
}

impl<H> SafeChainHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ChainRuntimeHooks for SafeChainHooks<H>
where
    H: ChainRuntimeHooks,
{
    fn on_state_change(&self, state: ChainState) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_state_change(state)));
    }

    fn on_stage_start(&self, index: usize, stage: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.on_stage_start(index, stage)));
    }

    fn on_stage_success(&self, index: usize, stage: &str, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_stage_success(index, stage, elapsed)
        }));
    }

    fn on_stage_failure(&self, index: usize, stage: &str, error: &ChainError, elapsed: Duration) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_stage_failure(index, stage, error, elapsed)
        }));
    }
}

pub struct SafeToolHooks<H> {
    inner: H,
}

impl<H> SafeToolHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ToolRuntimeHooks for SafeToolHooks<H>
where
    H: ToolRuntimeHooks,
{
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_execution_start(tool_call, context)
        }));
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_success(tool_call, context, result, elapsed)
        }));
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_execution_failure(tool_call, context, error, elapsed)
        }));
    }
}
