//! The [`ToolDyn`] trait and [`ToolRegistry`].
//!
//! Directly grounded in the teacher's `neuron_tool::{ToolDyn, ToolRegistry}`:
//! same object-safe boxed-future shape, same `HashMap<String, Arc<dyn
//! ToolDyn>>` registry. Diverges in one way — `call` takes a
//! [`ToolContext`] so tools can reach the corpus and provider — and
//! returns a plain `String` rather than a `serde_json::Value`, since the
//! agent loop re-injects every tool result into the transcript as a
//! string (`spec.md` §4.4, §4.9).

use crate::context::ToolContext;
use crate::error::ToolError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Object-safe trait every tool implements.
pub trait ToolDyn: Send + Sync {
    /// The tool's unique name, as advertised to the LM.
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's input parameters.
    fn input_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given input against the shared context.
    fn call<'a>(
        &'a self,
        input: serde_json::Value,
        ctx: &'a ToolContext,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>>;
}

/// Registry of tools available to the agent loop.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolDyn>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Overwrites any existing tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn ToolDyn>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolDyn>> {
        self.tools.get(name)
    }

    /// Iterate over all registered tools.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn ToolDyn>> {
        self.tools.values()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatch a named tool call, mapping an unknown name to
    /// [`ToolError::NotFound`].
    pub async fn call(
        &self,
        name: &str,
        input: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<String, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;
        tool.call(input, ctx).await
    }

    /// Render every registered tool as a [`lighthouse_provider::ToolSchema`]
    /// for the provider's tool-use request.
    pub fn schemas(&self) -> Vec<lighthouse_provider::ToolSchema> {
        self.tools
            .values()
            .map(|tool| lighthouse_provider::ToolSchema {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
