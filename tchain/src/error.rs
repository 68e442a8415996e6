//! Chain-level errors carrying the failing stage and its input.

use std::error::Error;
use std::fmt::{Display, Formatter};

use tcommon::Interruption;
use tprovider::{ProviderError, ProviderErrorKind};
use ttooling::{ToolError, ToolErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainErrorKind {
    /// Template input could not be parsed or formatted.
    TemplateParse,
    Provider,
    /// A model answer could not be turned into the expected output.
    Parse,
    Tool,
    Cancelled,
    Timeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainError {
    pub kind: ChainErrorKind,
    pub message: String,
    pub stage_index: Option<usize>,
    pub stage_name: Option<String>,
    /// Value threaded through the chain as it was before the failing stage.
    pub context: Option<String>,
    pub provider_error: Option<ProviderError>,
    pub tool_error: Option<ToolError>,
}

impl ChainError {
    pub fn new(kind: ChainErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            stage_index: None,
            stage_name: None,
            context: None,
            provider_error: None,
            tool_error: None,
        }
    }

    pub fn template_parse(message: impl Into<String>) -> Self {
        Self::new(ChainErrorKind::TemplateParse, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ChainErrorKind::Parse, message)
    }

    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ChainErrorKind::Cancelled, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ChainErrorKind::Timeout, message)
    }

    pub(crate) fn at_stage(
        mut self,
        index: usize,
        name: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        self.stage_index = Some(index);
        self.stage_name = Some(name.into());
        self.context = Some(context.into());
        self
    }
}

impl Display for ChainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.stage_index, self.stage_name.as_deref()) {
            (Some(index), Some(name)) => write!(
                f,
                "{:?} [stage={index}:{name}]: {}",
                self.kind, self.message
            ),
            _ => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl Error for ChainError {}

impl From<ProviderError> for ChainError {
    fn from(value: ProviderError) -> Self {
        let kind = match value.kind {
            ProviderErrorKind::Cancelled => ChainErrorKind::Cancelled,
            ProviderErrorKind::Timeout => ChainErrorKind::Timeout,
            _ => ChainErrorKind::Provider,
        };
        let mut error = ChainError::new(kind, value.to_string());
        error.provider_error = Some(value);
        error
    }
}

impl From<ToolError> for ChainError {
    fn from(value: ToolError) -> Self {
        let kind = match value.kind {
            ToolErrorKind::Cancelled => ChainErrorKind::Cancelled,
            ToolErrorKind::Timeout => ChainErrorKind::Timeout,
            _ => ChainErrorKind::Tool,
        };
        let mut error = ChainError::new(kind, value.to_string());
        error.tool_error = Some(value);
        error
    }
}

impl From<Interruption> for ChainError {
    fn from(value: Interruption) -> Self {
        match value {
            Interruption::Cancelled => ChainError::cancelled(value.to_string()),
            Interruption::DeadlineElapsed => ChainError::timeout(value.to_string()),
        }
    }
}
