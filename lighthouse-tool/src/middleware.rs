//! Tracing middleware wrapping tool dispatch.
//!
//! Grounded in the teacher's `neuron_tool::middleware` `Next`-chain
//! pattern, narrowed to the one cross-cutting concern this assistant
//! needs: a structured span per tool call. The teacher's version
//! supports an arbitrary ordered chain of middleware (auth, rate
//! limiting, retries); this assistant's auth and rate limiting live at
//! the HTTP surface, not the tool layer, so a single wrapping function is
//! enough rather than a full `Vec<Arc<dyn ToolMiddleware>>` pipeline.

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::registry::ToolRegistry;
use tracing::Instrument;

/// Dispatch `name` through `registry`, wrapping the call in a tracing
/// span that records the tool name and outcome.
pub async fn dispatch_with_tracing(
    registry: &ToolRegistry,
    name: &str,
    input: serde_json::Value,
    ctx: &ToolContext,
) -> Result<String, ToolError> {
    let span = tracing::info_span!("tool_call", tool = %name);
    async {
        tracing::debug!(input = %input, "dispatching tool call");
        let result = registry.call(name, input, ctx).await;

        match &result {
            Ok(output) => tracing::debug!(output_len = output.len(), "tool call succeeded"),
            Err(err) => tracing::warn!(error = %err, "tool call failed"),
        }

        result
    }
    .instrument(span)
    .await
}
