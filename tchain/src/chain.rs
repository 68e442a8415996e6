//! Linear chain executor.
//!
//! A chain threads one text value through its stages in order. The first
//! failing stage halts the run; the error names that stage and carries the
//! value it received.
//!
//! ```rust
//! use tchain::{Chain, ChainErrorKind, FnStage, PromptFormatter};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let chain = Chain::builder()
//!     .stage(PromptFormatter::from_template("Tell me a joke about {topic}."))
//!     .stage(FnStage::new("shout", |text| Ok(text.to_uppercase())))
//!     .build();
//!
//! let output = chain.run(r#"{"topic":"ducks"}"#).await.expect("chain should run");
//! assert_eq!(output, "TELL ME A JOKE ABOUT DUCKS.");
//!
//! let error = chain.run("not json").await.expect_err("bad input");
//! assert_eq!(error.kind, ChainErrorKind::TemplateParse);
//! assert_eq!(error.stage_index, Some(0));
//! # }
//! ```

use std::sync::Arc;
use std::time::Instant;

use tcommon::CallContext;

use crate::{ChainError, ChainRuntimeHooks, NoopChainRuntimeHooks, Runnable};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Ready,
    /// Stage `k` is executing.
    Running(usize),
    Completed,
    /// Stage `k` failed; later stages never ran.
    Failed(usize),
}

#[derive(Clone)]
pub struct Chain {
    stages: Vec<Arc<dyn Runnable>>,
    hooks: Arc<dyn ChainRuntimeHooks>,
}

impl std::fmt::Debug for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chain")
            .field("stages", &self.stage_names())
            .finish_non_exhaustive()
    }
}

impl Chain {
    pub fn builder() -> ChainBuilder {
        ChainBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub async fn run(&self, input: impl Into<String>) -> Result<String, ChainError> {
        self.run_with(&CallContext::new(), input).await
    }

    /// Runs every stage under `ctx`; cancellation or an elapsed deadline
    /// interrupts the current stage and stops the chain.
    pub async fn run_with(
        &self,
        ctx: &CallContext,
        input: impl Into<String>,
    ) -> Result<String, ChainError> {
        let mut context = input.into();
        self.hooks.on_state_change(ChainState::Ready);

        for (index, stage) in self.stages.iter().enumerate() {
            self.hooks.on_state_change(ChainState::Running(index));
            self.hooks.on_stage_start(index, stage.name());
            let started = Instant::now();

            let outcome = match ctx.guard(stage.invoke(ctx, context.clone())).await {
                Ok(outcome) => outcome,
                Err(interruption) => Err(ChainError::from(interruption)),
            };

            match outcome {
                Ok(next) => {
                    self.hooks
                        .on_stage_success(index, stage.name(), started.elapsed());
                    context = next;
                }
                Err(error) => {
                    let error = error.at_stage(index, stage.name(), context);
                    self.hooks
                        .on_stage_failure(index, stage.name(), &error, started.elapsed());
                    self.hooks.on_state_change(ChainState::Failed(index));
                    return Err(error);
                }
            }
        }

        self.hooks.on_state_change(ChainState::Completed);
        Ok(context)
    }
}

#[derive(Default)]
pub struct ChainBuilder {
    stages: Vec<Arc<dyn Runnable>>,
    hooks: Option<Arc<dyn ChainRuntimeHooks>>,
}

impl ChainBuilder {
    pub fn stage<R>(mut self, stage: R) -> Self
    where
        R: Runnable + 'static,
    {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn shared_stage(mut self, stage: Arc<dyn Runnable>) -> Self {
        self.stages.push(stage);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn ChainRuntimeHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// An empty chain returns its input unchanged.
    pub fn build(self) -> Chain {
        Chain {
            stages: self.stages,
            hooks: self
                .hooks
                .unwrap_or_else(|| Arc::new(NoopChainRuntimeHooks)),
        }
    }
}
