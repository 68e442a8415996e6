//! Concurrent fan-out of independent prompts with ordered collection.
//!
//! Every prompt runs on its own tokio task. Successful outputs land in the
//! slot matching the prompt's input position; failures are pushed onto a
//! shared channel and drained once every task has joined.
//!
//! ```rust
//! use tcommon::CallContext;
//! use tprovider::BatchDispatcher;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let dispatcher = BatchDispatcher::new();
//! let prompts = vec!["a".to_string(), "b".to_string()];
//!
//! let outputs = dispatcher
//!     .dispatch(&CallContext::new(), prompts, |_ctx, prompt| async move {
//!         Ok(prompt.to_uppercase())
//!     })
//!     .await
//!     .expect("batch should succeed");
//!
//! assert_eq!(outputs, vec!["A".to_string(), "B".to_string()]);
//! # }
//! ```

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tcommon::CallContext;
use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;

use crate::{BatchError, BatchFailure, ProviderError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchDispatcher {
    max_concurrency: Option<usize>,
}

impl BatchDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps in-flight prompts. Zero means unbounded.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = (limit > 0).then_some(limit);
        self
    }

    pub fn max_concurrency(&self) -> Option<usize> {
        self.max_concurrency
    }

    /// All-or-nothing dispatch: either every output in input order, or every
    /// failed index with its cause.
    pub async fn dispatch<F, Fut>(
        &self,
        ctx: &CallContext,
        prompts: Vec<String>,
        invoke: F,
    ) -> Result<Vec<String>, BatchError>
    where
        F: Fn(CallContext, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ProviderError>> + Send + 'static,
    {
        self.dispatch_settled(ctx, prompts, invoke)
            .await
            .into_result()
    }

    /// Runs every prompt to completion and keeps partial results.
    pub async fn dispatch_settled<F, Fut>(
        &self,
        ctx: &CallContext,
        prompts: Vec<String>,
        invoke: F,
    ) -> BatchReport
    where
        F: Fn(CallContext, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ProviderError>> + Send + 'static,
    {
        let total = prompts.len();
        if total == 0 {
            return BatchReport::default();
        }

        let invoke = Arc::new(invoke);
        let limiter = self
            .max_concurrency
            .map(|limit| Arc::new(Semaphore::new(limit)));
        let (failure_tx, mut failure_rx) = mpsc::unbounded_channel::<BatchFailure>();
        let mut tasks = JoinSet::new();

        for (index, prompt) in prompts.into_iter().enumerate() {
            let invoke = Arc::clone(&invoke);
            let limiter = limiter.clone();
            let ctx = ctx.clone();
            let failures = failure_tx.clone();

            tasks.spawn(async move {
                let outcome = AssertUnwindSafe(run_slot(ctx, prompt, invoke, limiter))
                    .catch_unwind()
                    .await;

                let error = match outcome {
                    Ok(Ok(output)) => return (index, Some(output)),
                    Ok(Err(error)) => error,
                    Err(payload) => ProviderError::other(format!(
                        "prompt task panicked: {}",
                        panic_message(payload.as_ref())
                    )),
                };

                // The receiver outlives every task.
                let _ = failures.send(BatchFailure::new(index, error));
                (index, None)
            });
        }
        drop(failure_tx);

        let mut slots = vec![None; total];
        while let Some(joined) = tasks.join_next().await {
            if let Ok((index, output)) = joined {
                slots[index] = output;
            }
        }

        let mut failures = Vec::new();
        while let Some(failure) = failure_rx.recv().await {
            failures.push(failure);
        }

        for (index, slot) in slots.iter().enumerate() {
            if slot.is_none() && !failures.iter().any(|failure| failure.index == index) {
                failures.push(BatchFailure::new(
                    index,
                    ProviderError::other("prompt task ended without reporting a result"),
                ));
            }
        }
        failures.sort_by_key(|failure| failure.index);

        BatchReport { slots, failures }
    }
}

async fn run_slot<F, Fut>(
    ctx: CallContext,
    prompt: String,
    invoke: Arc<F>,
    limiter: Option<Arc<Semaphore>>,
) -> Result<String, ProviderError>
where
    F: Fn(CallContext, String) -> Fut,
    Fut: Future<Output = Result<String, ProviderError>>,
{
    let _permit = match limiter {
        Some(limiter) => Some(
            ctx.guard(limiter.acquire_owned())
                .await?
                .map_err(|_| ProviderError::other("batch limiter closed"))?,
        ),
        None => None,
    };

    ctx.guard(invoke(ctx.clone(), prompt)).await?
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Settled outcome of a batch: one slot per prompt plus every failure.
///
/// A slot is `Some` exactly when its prompt succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    slots: Vec<Option<String>>,
    failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn slots(&self) -> &[Option<String>] {
        &self.slots
    }

    pub fn failures(&self) -> &[BatchFailure] {
        &self.failures
    }

    pub fn total(&self) -> usize {
        self.slots.len()
    }

    pub fn succeeded(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Option<String>>, Vec<BatchFailure>) {
        (self.slots, self.failures)
    }

    pub fn into_result(self) -> Result<Vec<String>, BatchError> {
        if !self.failures.is_empty() {
            return Err(BatchError::new(self.slots.len(), self.failures));
        }
        Ok(self.slots.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;
    use crate::ProviderErrorKind;

    fn prompts(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("p{i}")).collect()
    }

    #[tokio::test]
    async fn empty_batch_is_empty_success() {
        let outputs = BatchDispatcher::new()
            .dispatch(&CallContext::new(), Vec::new(), |_ctx, prompt| async move {
                Ok(prompt)
            })
            .await
            .expect("empty batch");
        assert!(outputs.is_empty());
    }

    #[tokio::test]
    async fn panicking_task_is_reported_at_its_index() {
        let report = BatchDispatcher::new()
            .dispatch_settled(&CallContext::new(), prompts(3), |_ctx, prompt| async move {
                if prompt == "p1" {
                    panic!("boom");
                }
                Ok(prompt)
            })
            .await;

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].index, 1);
        assert!(report.failures()[0].error.message.contains("boom"));
        assert_eq!(report.slots()[2].as_deref(), Some("p2"));
    }

    #[tokio::test]
    async fn max_concurrency_limits_in_flight_tasks() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let dispatcher = BatchDispatcher::new().with_max_concurrency(2);
        let tracker = (Arc::clone(&in_flight), Arc::clone(&peak));
        let outputs = dispatcher
            .dispatch(&CallContext::new(), prompts(8), move |_ctx, prompt| {
                let (in_flight, peak) = (Arc::clone(&tracker.0), Arc::clone(&tracker.1));
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(5)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    Ok(prompt)
                }
            })
            .await
            .expect("batch should succeed");

        assert_eq!(outputs, prompts(8));
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[test]
    fn zero_concurrency_means_unbounded() {
        assert_eq!(BatchDispatcher::new().with_max_concurrency(0).max_concurrency(), None);
        assert_eq!(
            BatchDispatcher::new().with_max_concurrency(4).max_concurrency(),
            Some(4)
        );
    }

    #[tokio::test]
    async fn cancelled_context_fails_every_slot() {
        let ctx = CallContext::new();
        ctx.cancel();

        let error = BatchDispatcher::new()
            .dispatch(&ctx, prompts(3), |_ctx, prompt| async move { Ok(prompt) })
            .await
            .expect_err("cancelled batch should fail");

        assert_eq!(error.failed_indices(), vec![0, 1, 2]);
        assert!(
            error
                .failures()
                .iter()
                .all(|failure| failure.error.kind == ProviderErrorKind::Cancelled)
        );
    }
}
