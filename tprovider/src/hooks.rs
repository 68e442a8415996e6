//! Lifecycle hooks fired around single calls and batches.

use std::time::Duration;

use crate::{ProviderError, ProviderId};

pub trait ProviderOperationHooks: Send + Sync {
    fn on_call_start(&self, _provider: ProviderId, _model: &str) {}

    fn on_call_success(&self, _provider: ProviderId, _model: &str, _elapsed: Duration) {}

    fn on_call_failure(
        &self,
        _provider: ProviderId,
        _model: &str,
        _error: &ProviderError,
        _elapsed: Duration,
    ) {
    }

    fn on_batch_start(&self, _provider: ProviderId, _model: &str, _size: usize) {}

    fn on_batch_complete(
        &self,
        _provider: ProviderId,
        _model: &str,
        _size: usize,
        _failures: usize,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopOperationHooks;

impl ProviderOperationHooks for NoopOperationHooks {}
