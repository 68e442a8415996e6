//! Backend transport seam implemented once per provider.

use crate::{ChatRequest, ProviderError, ProviderId, ProviderReply};

pub use tcommon::BoxFuture as ProviderFuture;

/// Sends one non-streaming chat request to a concrete backend.
///
/// Implementations only move bytes: validation, hooks, cancellation and
/// empty-content checks live in [`crate::ChatModel`].
pub trait ProviderClient: Send + Sync + std::fmt::Debug {
    fn id(&self) -> ProviderId;

    /// Model used when the caller does not pick one.
    fn default_model(&self) -> &str;

    fn chat<'a>(
        &'a self,
        request: ChatRequest,
    ) -> ProviderFuture<'a, Result<ProviderReply, ProviderError>>;
}
