//! Shared utilities and strongly-typed common values for workspace crates.
//!
//! ```rust
//! use std::time::Duration;
//!
//! use tcommon::{CallContext, GenerationOptions, MetadataMap};
//!
//! let ctx = CallContext::new().with_timeout(Duration::from_secs(30));
//! let mut metadata = MetadataMap::new();
//! metadata.insert("tenant".to_string(), "acme".to_string());
//!
//! let options = GenerationOptions::default().with_temperature(0.3);
//! assert!(ctx.deadline().is_some());
//! assert!(!ctx.is_cancelled());
//! assert_eq!(options.temperature, Some(0.3));
//! ```

pub mod future {
    //! Shared async future aliases.
    //!
    //! ```rust
    //! use tcommon::BoxFuture;
    //!
    //! fn str_len<'a>(value: &'a str) -> BoxFuture<'a, usize> {
    //!     Box::pin(async move { value.len() })
    //! }
    //!
    //! let _future = str_len("hello");
    //! ```

    use std::future::Future;
    use std::pin::Pin;

    pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
}

pub mod context {
    //! Per-call cancellation and deadline propagation.
    //!
    //! A [`CallContext`] is cheap to clone; every clone observes the same
    //! cancellation signal, so one context can be handed to many concurrent
    //! tasks and cancelled from the outside.
    //!
    //! ```rust
    //! use tcommon::{CallContext, Interruption};
    //!
    //! # #[tokio::main(flavor = "current_thread")]
    //! # async fn main() {
    //! let ctx = CallContext::new();
    //! let worker = ctx.clone();
    //! ctx.cancel();
    //!
    //! let outcome = worker.guard(std::future::pending::<()>()).await;
    //! assert_eq!(outcome, Err(Interruption::Cancelled));
    //! # }
    //! ```

    use std::collections::HashMap;
    use std::fmt::{Display, Formatter};
    use std::future::Future;
    use std::time::Duration;

    use tokio::time::Instant;
    use tokio_util::sync::CancellationToken;

    pub type MetadataMap = HashMap<String, String>;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Interruption {
        Cancelled,
        DeadlineElapsed,
    }

    impl Display for Interruption {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            match self {
                Self::Cancelled => f.write_str("operation cancelled by caller"),
                Self::DeadlineElapsed => f.write_str("operation deadline elapsed"),
            }
        }
    }

    #[derive(Debug, Clone, Default)]
    pub struct CallContext {
        cancel: CancellationToken,
        deadline: Option<Instant>,
    }

    impl CallContext {
        pub fn new() -> Self {
            Self::default()
        }

        /// Builds a context driven by an externally owned token.
        pub fn with_cancellation(token: CancellationToken) -> Self {
            Self {
                cancel: token,
                deadline: None,
            }
        }

        pub fn with_deadline(mut self, deadline: Instant) -> Self {
            self.deadline = Some(deadline);
            self
        }

        pub fn with_timeout(self, timeout: Duration) -> Self {
            self.with_deadline(Instant::now() + timeout)
        }

        /// Derives a context that is cancelled with its parent but can also be
        /// cancelled on its own.
        pub fn child(&self) -> Self {
            Self {
                cancel: self.cancel.child_token(),
                deadline: self.deadline,
            }
        }

        pub fn cancel(&self) {
            self.cancel.cancel();
        }

        pub fn is_cancelled(&self) -> bool {
            self.cancel.is_cancelled()
        }

        pub fn cancellation_token(&self) -> &CancellationToken {
            &self.cancel
        }

        pub fn deadline(&self) -> Option<Instant> {
            self.deadline
        }

        pub fn is_expired(&self) -> bool {
            self.deadline
                .is_some_and(|deadline| Instant::now() >= deadline)
        }

        /// Returns the interruption already in effect, if any.
        pub fn check(&self) -> Result<(), Interruption> {
            if self.is_cancelled() {
                return Err(Interruption::Cancelled);
            }
            if self.is_expired() {
                return Err(Interruption::DeadlineElapsed);
            }
            Ok(())
        }

        /// Drives `future` until it completes, the context is cancelled, or the
        /// deadline passes, whichever happens first. The future is dropped on
        /// interruption.
        pub async fn guard<F>(&self, future: F) -> Result<F::Output, Interruption>
        where
            F: Future,
        {
            self.check()?;

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Err(Interruption::Cancelled),
                _ = sleep_until(self.deadline) => Err(Interruption::DeadlineElapsed),
                output = future => Ok(output),
            }
        }
    }

    async fn sleep_until(deadline: Option<Instant>) {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => std::future::pending::<()>().await,
        }
    }
}

pub mod model {
    //! Shared generation settings used by request types.
    //!
    //! ```rust
    //! use tcommon::GenerationOptions;
    //!
    //! let options = GenerationOptions::default()
    //!     .with_temperature(0.2)
    //!     .with_max_tokens(128);
    //!
    //! assert_eq!(options.temperature, Some(0.2));
    //! assert_eq!(options.max_tokens, Some(128));
    //! ```

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct GenerationOptions {
        pub temperature: Option<f32>,
        pub max_tokens: Option<u32>,
    }

    impl GenerationOptions {
        pub fn with_temperature(mut self, temperature: f32) -> Self {
            self.temperature = Some(temperature);
            self
        }

        pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
            self.max_tokens = Some(max_tokens);
            self
        }

        /// Fills unset fields from `defaults`.
        pub fn or(self, defaults: GenerationOptions) -> Self {
            Self {
                temperature: self.temperature.or(defaults.temperature),
                max_tokens: self.max_tokens.or(defaults.max_tokens),
            }
        }
    }
}

pub mod registry {
    //! Generic registry map wrapper used by runtime registries.
    //!
    //! ```rust
    //! use tcommon::Registry;
    //!
    //! let mut registry = Registry::new();
    //! registry.insert("alpha".to_string(), 1_u32);
    //!
    //! assert_eq!(registry.get("alpha"), Some(&1));
    //! assert!(registry.contains_key("alpha"));
    //! ```

    use std::borrow::Borrow;
    use std::collections::HashMap;
    use std::hash::Hash;

    #[derive(Debug, Clone)]
    pub struct Registry<K, V> {
        items: HashMap<K, V>,
    }

    impl<K, V> Default for Registry<K, V>
    where
        K: Eq + Hash,
    {
        fn default() -> Self {
            Self {
                items: HashMap::new(),
            }
        }
    }

    impl<K, V> Registry<K, V>
    where
        K: Eq + Hash,
    {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn insert(&mut self, key: K, value: V) -> Option<V> {
            self.items.insert(key, value)
        }

        pub fn get<Q>(&self, key: &Q) -> Option<&V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.get(key)
        }

        pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.remove(key)
        }

        pub fn contains_key<Q>(&self, key: &Q) -> bool
        where
            K: Borrow<Q>,
            Q: Eq + Hash + ?Sized,
        {
            self.items.contains_key(key)
        }

        pub fn keys(&self) -> impl Iterator<Item = &K> {
            self.items.keys()
        }

        pub fn values(&self) -> impl Iterator<Item = &V> {
            self.items.values()
        }

        pub fn len(&self) -> usize {
            self.items.len()
        }

        pub fn is_empty(&self) -> bool {
            self.items.is_empty()
        }
    }
}

pub use context::{CallContext, Interruption, MetadataMap};
pub use future::BoxFuture;
pub use model::GenerationOptions;
pub use registry::Registry;
pub use tokio_util::sync::CancellationToken;
