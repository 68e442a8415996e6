use std::sync::{Arc, Mutex};
use std::time::Duration;

use tchain::{Chain, ChainError, ChainRuntimeHooks, ChainState, FnStage};
use tcommon::CallContext;
use tprovider::{ProviderError, ProviderId, ProviderOperationHooks};
use ttooling::{ToolCall, ToolError, ToolExecutionContext, ToolExecutionResult, ToolRuntimeHooks};

use crate::{
    MetricsObservabilityHooks, SafeChainHooks, SafeProviderHooks, SafeToolHooks,
    TracingObservabilityHooks,
};

fn sample_tool_call() -> ToolCall {
    ToolCall::new("echo-0", "echo", "{}")
}

fn sample_tool_context() -> ToolExecutionContext {
    ToolExecutionContext::new(CallContext::new()).with_metadata("chain", "jokes")
}

fn exercise_provider_hooks(hooks: &dyn ProviderOperationHooks) {
    let provider_error = ProviderError::timeout("provider timeout");

    hooks.on_call_start(ProviderId::Ollama, "qwen3:8b");
    hooks.on_call_success(ProviderId::Ollama, "qwen3:8b", Duration::from_millis(10));
    hooks.on_call_failure(
        ProviderId::DeepSeek,
        "deepseek-chat",
        &provider_error,
        Duration::from_millis(10),
    );
    hooks.on_batch_start(ProviderId::Ollama, "qwen3:8b", 3);
    hooks.on_batch_complete(
        ProviderId::Ollama,
        "qwen3:8b",
        3,
        1,
        Duration::from_millis(30),
    );
}

fn exercise_chain_hooks(hooks: &dyn ChainRuntimeHooks) {
    let chain_error = ChainError::parse("no answer field");

    hooks.on_state_change(ChainState::Ready);
    hooks.on_state_change(ChainState::Running(0));
    hooks.on_stage_start(0, "prompt_formatter");
    hooks.on_stage_success(0, "prompt_formatter", Duration::from_millis(1));
    hooks.on_stage_failure(1, "json_field:answer", &chain_error, Duration::from_millis(2));
    hooks.on_state_change(ChainState::Failed(1));
}

fn exercise_tool_hooks(hooks: &dyn ToolRuntimeHooks) {
    let tool_error = ToolError::execution("tool failed");

    hooks.on_execution_start(&sample_tool_call(), &sample_tool_context());
    hooks.on_execution_success(
        &sample_tool_call(),
        &sample_tool_context(),
        &ToolExecutionResult::new("echo-0", "ok"),
        Duration::from_millis(20),
    );
    hooks.on_execution_failure(
        &sample_tool_call(),
        &sample_tool_context(),
        &tool_error,
        Duration::from_millis(20),
    );
}

#[test]
fn tracing_hooks_smoke_test_all_callbacks() {
    let hooks = TracingObservabilityHooks;
    exercise_provider_hooks(&hooks);
    exercise_chain_hooks(&hooks);
    exercise_tool_hooks(&hooks);
}

#[test]
fn metrics_hooks_smoke_test_all_callbacks() {
    let hooks = MetricsObservabilityHooks;
    exercise_provider_hooks(&hooks);
    exercise_chain_hooks(&hooks);
    exercise_tool_hooks(&hooks);
}

#[derive(Default, Clone)]
struct RecordingHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl RecordingHooks {
    fn push(&self, event: &'static str) {
        self.events.lock().expect("events lock").push(event);
    }

    fn count(&self) -> usize {
        self.events.lock().expect("events lock").len()
    }
}

impl ProviderOperationHooks for RecordingHooks {
    fn on_call_start(&self, _provider: ProviderId, _model: &str) {
        self.push("call_start");
    }

    fn on_call_success(&self, _provider: ProviderId, _model: &str, _elapsed: Duration) {
        self.push("call_success");
    }

    fn on_call_failure(
        &self,
        _provider: ProviderId,
        _model: &str,
        _error: &ProviderError,
        _elapsed: Duration,
    ) {
        self.push("call_failure");
    }

    fn on_batch_start(&self, _provider: ProviderId, _model: &str, _size: usize) {
        self.push("batch_start");
    }

    fn on_batch_complete(
        &self,
        _provider: ProviderId,
        _model: &str,
        _size: usize,
        _failures: usize,
        _elapsed: Duration,
    ) {
        self.push("batch_complete");
    }
}

impl ChainRuntimeHooks for RecordingHooks {
    fn on_state_change(&self, _state: ChainState) {
        self.push("state_change");
    }

    fn on_stage_start(&self, _index: usize, _stage: &str) {
        self.push("stage_start");
    }

    fn on_stage_success(&self, _index: usize, _stage: &str, _elapsed: Duration) {
        self.push("stage_success");
    }

    fn on_stage_failure(
        &self,
        _index: usize,
        _stage: &str,
        _error: &ChainError,
        _elapsed: Duration,
    ) {
        self.push("stage_failure");
    }
}

impl ToolRuntimeHooks for RecordingHooks {
    fn on_execution_start(&self, _tool_call: &ToolCall, _context: &ToolExecutionContext) {
        self.push("start");
    }

    fn on_execution_success(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        _elapsed: Duration,
    ) {
        self.push("success");
    }

    fn on_execution_failure(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        self.push("failure");
    }
}

struct PanicHooks;

impl ProviderOperationHooks for PanicHooks {
    fn on_call_start(&self, _provider: ProviderId, _model: &str) {
        panic!("call_start panic");
    }

    fn on_call_success(&self, _provider: ProviderId, _model: &str, _elapsed: Duration) {
        panic!("call_success panic");
    }

    fn on_call_failure(
        &self,
        _provider: ProviderId,
        _model: &str,
        _error: &ProviderError,
        _elapsed: Duration,
    ) {
        panic!("call_failure panic");
    }

    fn on_batch_start(&self, _provider: ProviderId, _model: &str, _size: usize) {
        panic!("batch_start panic");
    }

    fn on_batch_complete(
        &self,
        _provider: ProviderId,
        _model: &str,
        _size: usize,
        _failures: usize,
        _elapsed: Duration,
    ) {
        panic!("batch_complete panic");
    }
}

impl ChainRuntimeHooks for PanicHooks {
    fn on_state_change(&self, _state: ChainState) {
        panic!("state panic");
    }

    fn on_stage_start(&self, _index: usize, _stage: &str) {
        panic!("stage_start panic");
    }

    fn on_stage_success(&self, _index: usize, _stage: &str, _elapsed: Duration) {
        panic!("stage_success panic");
    }

    fn on_stage_failure(
        &self,
        _index: usize,
        _stage: &str,
        _error: &ChainError,
        _elapsed: Duration,
    ) {
        panic!("stage_failure panic");
    }
}

impl ToolRuntimeHooks for PanicHooks {
    fn on_execution_start(&self, _tool_call: &ToolCall, _context: &ToolExecutionContext) {
        panic!("start panic");
    }

    fn on_execution_success(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _result: &ToolExecutionResult,
        _elapsed: Duration,
    ) {
        panic!("success panic");
    }

    fn on_execution_failure(
        &self,
        _tool_call: &ToolCall,
        _context: &ToolExecutionContext,
        _error: &ToolError,
        _elapsed: Duration,
    ) {
        panic!("failure panic");
    }
}

#[test]
fn safe_hooks_delegate_when_inner_succeeds() {
    let inner = RecordingHooks::default();

    exercise_provider_hooks(&SafeProviderHooks::new(inner.clone()));
    assert_eq!(inner.count(), 5);

    exercise_chain_hooks(&SafeChainHooks::new(inner.clone()));
    assert_eq!(inner.count(), 11);

    exercise_tool_hooks(&SafeToolHooks::new(inner.clone()));
    assert_eq!(inner.count(), 14);
}

#[test]
fn safe_hooks_swallow_panics() {
    exercise_provider_hooks(&SafeProviderHooks::new(PanicHooks));
    exercise_chain_hooks(&SafeChainHooks::new(PanicHooks));
    exercise_tool_hooks(&SafeToolHooks::new(PanicHooks));
}

#[tokio::test]
async fn chain_survives_panicking_hooks() {
    let chain = Chain::builder()
        .stage(FnStage::new("upper", |input| Ok(input.to_uppercase())))
        .hooks(Arc::new(SafeChainHooks::new(PanicHooks)))
        .build();

    let output = chain.run("quiet").await.expect("chain should run");
    assert_eq!(output, "QUIET");
}
