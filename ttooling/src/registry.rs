//! Explicit name-to-handler tool registry.
//!
//! ```rust
//! use serde::Deserialize;
//! use ttooling::{ToolDefinition, ToolRegistry};
//!
//! #[derive(Deserialize)]
//! struct Search {
//!     query: String,
//! }
//!
//! let mut registry = ToolRegistry::new();
//! registry.register_typed(
//!     ToolDefinition::new("search", "Searches the web", r#"{"type":"object"}"#),
//!     |input: Search, _ctx| async move { Ok(format!("Search with {}", input.query)) },
//! );
//!
//! assert!(registry.contains("search"));
//! ```

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tcommon::Registry;

use crate::{FunctionTool, Tool, ToolDefinition, ToolError, ToolExecutionContext, parse_typed};

#[derive(Default)]
pub struct ToolRegistry {
    tools: Registry<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers under the tool's definition name, replacing any previous entry.
    pub fn register<T>(&mut self, tool: T)
    where
        T: Tool + 'static,
    {
        let name = tool.definition().name;
        self.tools.insert(name, Arc::new(tool));
    }

    pub fn register_fn<F, Fut>(&mut self, definition: ToolDefinition, handler: F)
    where
        F: Fn(String, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        self.register(FunctionTool::new(definition, handler));
    }

    pub fn register_sync_fn<F>(&mut self, definition: ToolDefinition, handler: F)
    where
        F: Fn(String, ToolExecutionContext) -> Result<String, ToolError> + Send + Sync + 'static,
    {
        self.register_fn(definition, move |args_json, context| {
            let output = handler(args_json, context);
            async move { output }
        });
    }

    /// Registers a handler whose arguments are deserialized into `I` before
    /// it runs.
    pub fn register_typed<I, F, Fut>(&mut self, definition: ToolDefinition, handler: F)
    where
        I: DeserializeOwned + Send + 'static,
        F: Fn(I, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String, ToolError>> + Send + 'static,
    {
        self.register_fn(definition, move |args_json, context| {
            let pending = parse_typed::<I>(&args_json).map(|input| handler(input, context));
            async move { pending?.await }
        });
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.remove(name)
    }

    /// Definitions sorted by name.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut definitions = self
            .tools
            .values()
            .map(|tool| tool.definition())
            .collect::<Vec<_>>();
        definitions.sort_by(|left, right| left.name.cmp(&right.name));
        definitions
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
