//! Stage contract shared by every chain step.

use std::sync::Arc;

use tcommon::{BoxFuture, CallContext};

use crate::ChainError;

/// One text-to-text transformation inside a [`crate::Chain`].
pub trait Runnable: Send + Sync {
    fn name(&self) -> &str;

    fn invoke<'a>(
        &'a self,
        ctx: &'a CallContext,
        input: String,
    ) -> BoxFuture<'a, Result<String, ChainError>>;
}

impl<R> Runnable for Arc<R>
where
    R: Runnable + ?Sized,
{
    fn name(&self) -> &str {
        self.as_ref().name()
    }

    fn invoke<'a>(
        &'a self,
        ctx: &'a CallContext,
        input: String,
    ) -> BoxFuture<'a, Result<String, ChainError>> {
        self.as_ref().invoke(ctx, input)
    }
}

type StageFn = dyn Fn(String) -> Result<String, ChainError> + Send + Sync;

/// Synchronous closure stage.
///
/// ```rust
/// use tchain::{FnStage, Runnable};
/// use tcommon::CallContext;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let shout = FnStage::new("shout", |input| Ok(input.to_uppercase()));
/// let output = shout.invoke(&CallContext::new(), "hi".to_string()).await;
/// assert_eq!(output.expect("stage"), "HI");
/// # }
/// ```
#[derive(Clone)]
pub struct FnStage {
    name: String,
    handler: Arc<StageFn>,
}

impl FnStage {
    pub fn new<F>(name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(String) -> Result<String, ChainError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            handler: Arc::new(handler),
        }
    }
}

impl std::fmt::Debug for FnStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStage")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Runnable for FnStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn invoke<'a>(
        &'a self,
        _ctx: &'a CallContext,
        input: String,
    ) -> BoxFuture<'a, Result<String, ChainError>> {
        let output = (self.handler)(input);
        Box::pin(async move { output })
    }
}
