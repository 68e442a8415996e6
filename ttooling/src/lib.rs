//! Capability layer for registering and executing tools.
//!
//! Tools are looked up by name in an explicit [`ToolRegistry`]; typed tools
//! get their JSON arguments deserialized before the handler runs.

mod args;
mod error;
mod hooks;
mod registry;
mod runtime;
mod tool;
mod types;

pub mod prelude {
    pub use crate::{
        DefaultToolRuntime, FunctionTool, NoopToolRuntimeHooks, Tool, ToolCall, ToolDefinition,
        ToolError, ToolErrorKind, ToolExecutionContext, ToolExecutionResult, ToolFuture,
        ToolRegistry, ToolRuntime, ToolRuntimeHooks,
    };
}

pub use args::{parse_json_object, parse_json_value, parse_typed, required_string};
pub use error::{ToolError, ToolErrorKind};
pub use hooks::{NoopToolRuntimeHooks, ToolRuntimeHooks};
pub use registry::ToolRegistry;
pub use runtime::{DefaultToolRuntime, ToolRuntime};
pub use tool::{FunctionTool, Tool, ToolFuture};
pub use types::{ToolCall, ToolDefinition, ToolExecutionContext, ToolExecutionResult};
