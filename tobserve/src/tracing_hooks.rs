//! Tracing hooks for provider, chain and tool runtime events.
//!
//! ```rust
//! use tchain::ChainRuntimeHooks;
//! use tobserve::TracingObservabilityHooks;
//!
//! fn accepts_chain_hooks(_hooks: &dyn ChainRuntimeHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_chain_hooks(&hooks);
//! ```

use std::time::Duration;

use tchain::{ChainError, ChainRuntimeHooks, ChainState};
use tprovider::{ProviderError, ProviderId, ProviderOperationHooks};
use ttooling::{ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_call_start(&self, provider: ProviderId, model: &str) {
        tracing::debug!(
            phase = "provider",
            event = "call_start",
            provider = %provider,
            model
        );
    }

    fn on_call_success(&self, provider: ProviderId, model: &str, elapsed: Duration) {
        tracing::info!(
            phase = "provider",
            event = "call_success",
            provider = %provider,
            model,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_call_failure(
        &self,
        provider: ProviderId,
        model: &str,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "provider",
            event = "call_failure",
            provider = %provider,
            model,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            status = error.status,
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_batch_start(&self, provider: ProviderId, model: &str, size: usize) {
        tracing::info!(
            phase = "provider",
            event = "batch_start",
            provider = %provider,
            model,
            size
        );
    }

    fn on_batch_complete(
        &self,
        provider: ProviderId,
        model: &str,
        size: usize,
        failures: usize,
        elapsed: Duration,
    ) {
        if failures == 0 {
            tracing::info!(
                phase = "provider",
                event = "batch_complete",
                provider = %provider,
                model,
                size,
                failures,
                elapsed_ms = elapsed.as_millis() as u64
            );
        } else {
            tracing::warn!(
                phase = "provider",
                event = "batch_complete",
                provider = %provider,
                model,
                size,
                failures,
                elapsed_ms = elapsed.as_millis() as u64
            );
        }
    }
}

impl ChainRuntimeHooks for TracingObservabilityHooks {
    fn on_state_change(&self, state: ChainState) {
        tracing::trace!(phase = "chain", event = "state_change", chain_state = ?state);
    }

    fn on_stage_start(&self, index: usize, stage: &str) {
        tracing::debug!(phase = "chain", event = "stage_start", stage_index = index, stage);
    }

    fn on_stage_success(&self, index: usize, stage: &str, elapsed: Duration) {
        tracing::info!(
            phase = "chain",
            event = "stage_success",
            stage_index = index,
            stage,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_stage_failure(&self, index: usize, stage: &str, error: &ChainError, elapsed: Duration) {
        tracing::error!(
            phase = "chain",
            event = "stage_failure",
            stage_index = index,
            stage,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }
}

impl ToolRuntimeHooks for TracingObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, context: &ToolExecutionContext) {
        tracing::info!(
            phase = "tool",
            event = "execution_start",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            metadata_entries = context.metadata.len()
        );
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "tool",
            event = "execution_success",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            output_bytes = result.output.len(),
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        tracing::error!(
            phase = "tool",
            event = "execution_failure",
            tool_name = tool_call.name,
            tool_call_id = tool_call.id,
            elapsed_ms = elapsed.as_millis() as u64,
            error_kind = ?error.kind,
            error = %error
        );
    }
}
