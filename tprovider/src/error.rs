//! Shared provider error kinds, batch aggregation, and error value helpers.
//!
//! ```rust
//! use tprovider::{BatchError, BatchFailure, ProviderError, ProviderErrorKind};
//!
//! let status = ProviderError::backend_status(503, "overloaded");
//! assert_eq!(status.kind, ProviderErrorKind::BackendStatus);
//! assert!(status.retryable);
//!
//! let batch = BatchError::new(
//!     3,
//!     vec![BatchFailure::new(1, ProviderError::empty_response("no content"))],
//! );
//! assert_eq!(batch.failed_indices(), vec![1]);
//! ```

use std::error::Error;
use std::fmt::{Display, Formatter};

use tcommon::Interruption;

const MAX_BODY_IN_DISPLAY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// The backend could not be reached or the payload could not be read.
    Transport,
    /// The backend answered with a non-success status.
    BackendStatus,
    /// The backend answered successfully but without usable content.
    EmptyResponse,
    InvalidRequest,
    Config,
    Cancelled,
    Timeout,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
    pub status: Option<u16>,
    pub body: Option<String>,
    pub retryable: bool,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            body: None,
            retryable,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Transport, message, true)
    }

    /// Builds a status error carrying the raw status code and response body.
    pub fn backend_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let retryable = status == 408 || status == 429 || status >= 500;
        Self {
            kind: ProviderErrorKind::BackendStatus,
            message: format!("backend returned status {status}"),
            status: Some(status),
            body: Some(body),
            retryable,
        }
    }

    pub fn empty_response(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::EmptyResponse, message, false)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::InvalidRequest, message, false)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Config, message, false)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Cancelled, message, false)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message, true)
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Other, message, false)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)?;
        if let Some(body) = self.body.as_deref()
            && !body.is_empty()
        {
            write!(f, " (body: {})", truncate(body, MAX_BODY_IN_DISPLAY))?;
        }
        Ok(())
    }
}

impl Error for ProviderError {}

impl From<Interruption> for ProviderError {
    fn from(value: Interruption) -> Self {
        match value {
            Interruption::Cancelled => ProviderError::cancelled(value.to_string()),
            Interruption::DeadlineElapsed => ProviderError::timeout(value.to_string()),
        }
    }
}

/// One failed prompt inside a batch, addressed by its input position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub index: usize,
    pub error: ProviderError,
}

impl BatchFailure {
    pub fn new(index: usize, error: ProviderError) -> Self {
        Self { index, error }
    }
}

impl Display for BatchFailure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "prompt {}: {}", self.index, self.error)
    }
}

/// Aggregate failure of a batch: every failed index with its cause.
///
/// Failures are kept sorted by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchError {
    total: usize,
    failures: Vec<BatchFailure>,
}

impl BatchError {
    pub fn new(total: usize, mut failures: Vec<BatchFailure>) -> Self {
        failures.sort_by_key(|failure| failure.index);
        Self { total, failures }
    }

    /// Number of prompts in the batch, successful or not.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn failures(&self) -> &[BatchFailure] {
        &self.failures
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.failures.iter().map(|failure| failure.index).collect()
    }

    pub fn error_for(&self, index: usize) -> Option<&ProviderError> {
        self.failures
            .iter()
            .find(|failure| failure.index == index)
            .map(|failure| &failure.error)
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn into_failures(self) -> Vec<BatchFailure> {
        self.failures
    }
}

impl Display for BatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} of {} prompts failed",
            self.failures.len(),
            self.total
        )?;
        for failure in &self.failures {
            write!(f, "; {failure}")?;
        }
        Ok(())
    }
}

impl Error for BatchError {}

pub(crate) fn truncate(input: &str, max: usize) -> String {
    if input.len() <= max {
        return input.to_string();
    }
    let mut end = max;
    while !input.is_char_boundary(end) {
        end -= 1;
    }
    let mut output = input[..end].to_string();
    output.push_str("...");
    output
}
