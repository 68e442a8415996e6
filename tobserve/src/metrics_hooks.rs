//! Metrics hooks for provider, chain and tool runtime events.
//!
//! ```rust
//! use tobserve::MetricsObservabilityHooks;
//! use tprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use std::time::Duration;

use tchain::{ChainError, ChainRuntimeHooks, ChainState};
use tprovider::{ProviderError, ProviderId, ProviderOperationHooks};
use ttooling::{ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_call_start(&self, provider: ProviderId, model: &str) {
        metrics::counter!(
            "tinychain_provider_call_start_total",
            "provider" => provider.to_string(),
            "model" => model.to_string()
        )
        .increment(1);
    }

    fn on_call_success(&self, provider: ProviderId, model: &str, elapsed: Duration) {
        metrics::counter!(
            "tinychain_provider_call_success_total",
            "provider" => provider.to_string(),
            "model" => model.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "tinychain_provider_call_duration_seconds",
            "provider" => provider.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_call_failure(
        &self,
        provider: ProviderId,
        model: &str,
        error: &ProviderError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "tinychain_provider_call_failure_total",
            "provider" => provider.to_string(),
            "model" => model.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "tinychain_provider_call_duration_seconds",
            "provider" => provider.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_batch_start(&self, provider: ProviderId, _model: &str, size: usize) {
        metrics::histogram!(
            "tinychain_provider_batch_size",
            "provider" => provider.to_string()
        )
        .record(size as f64);
    }

    fn on_batch_complete(
        &self,
        provider: ProviderId,
        _model: &str,
        _size: usize,
        failures: usize,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "tinychain_provider_batch_failed_prompts_total",
            "provider" => provider.to_string()
        )
        .increment(failures as u64);
        metrics::histogram!(
            "tinychain_provider_batch_duration_seconds",
            "provider" => provider.to_string(),
            "status" => if failures == 0 { "success" } else { "failure" }
        )
        .record(elapsed.as_secs_f64());
    }
}

impl ChainRuntimeHooks for MetricsObservabilityHooks {
    fn on_state_change(&self, state: ChainState) {
        let outcome = match state {
            ChainState::Completed => "completed",
            ChainState::Failed(_) => "failed",
            ChainState::Ready | ChainState::Running(_) => return,
        };
        metrics::counter!("tinychain_chain_runs_total", "outcome" => outcome).increment(1);
    }

    fn on_stage_start(&self, _index: usize, stage: &str) {
        metrics::counter!(
            "tinychain_chain_stage_start_total",
            "stage" => stage.to_string()
        )
        .increment(1);
    }

    fn on_stage_success(&self, _index: usize, stage: &str, elapsed: Duration) {
        metrics::histogram!(
            "tinychain_chain_stage_duration_seconds",
            "stage" => stage.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_stage_failure(&self, _index: usize, stage: &str, error: &ChainError, elapsed: Duration) {
        metrics::counter!(
            "tinychain_chain_stage_failure_total",
            "stage" => stage.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "tinychain_chain_stage_duration_seconds",
            "stage" => stage.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}

impl ToolRuntimeHooks for MetricsObservabilityHooks {
    fn on_execution_start(&self, tool_call: &ToolCall, _context: &ToolExecutionContext) {
        metrics::counter!(
            "tinychain_tool_execution_start_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
    }

    fn on_execution_success(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "tinychain_tool_execution_success_total",
            "tool_name" => tool_call.name.clone()
        )
        .increment(1);
        metrics::histogram!(
            "tinychain_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_execution_failure(
        &self,
        tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        error: &ToolError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "tinychain_tool_execution_failure_total",
            "tool_name" => tool_call.name.clone(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "tinychain_tool_execution_duration_seconds",
            "tool_name" => tool_call.name.clone(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}
