//! Runtime hooks for observing chain execution.
//!
//! ```rust
//! use tchain::{ChainRuntimeHooks, NoopChainRuntimeHooks};
//!
//! fn accepts_hooks(_hooks: &dyn ChainRuntimeHooks) {}
//!
//! accepts_hooks(&NoopChainRuntimeHooks);
//! ```

use std::time::Duration;

use crate::{ChainError, ChainState};

pub trait ChainRuntimeHooks: Send + Sync {
    fn on_state_change(&self, _state: ChainState) {}

    fn on_stage_start(&self, _index: usize, _stage: &str) {}

    fn on_stage_success(&self, _index: usize, _stage: &str, _elapsed: Duration) {}

    fn on_stage_failure(&self, _index: usize, _stage: &str, _error: &ChainError, _elapsed: Duration) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChainRuntimeHooks;

impl ChainRuntimeHooks for NoopChainRuntimeHooks {}
