#![deny(missing_docs)]
//! The tool registry and concrete tools exposed to the agent loop.
//!
//! Four tools implement [`ToolDyn`]: [`KnowledgeBaseTool`],
//! [`FetchArticlesTool`], [`SearchArticlesTool`], and
//! [`EscalateToHumanTool`] (`spec.md` §4.3). [`ToolRegistry`] and
//! [`ToolDyn`] are directly grounded in the teacher's
//! `neuron_tool::{ToolRegistry, ToolDyn}`.

pub mod context;
pub mod error;
pub mod escalate;
pub mod fetch_articles;
pub mod knowledge_base;
pub mod middleware;
pub mod registry;
pub mod search_articles;
#[cfg(test)]
mod test_support;

pub use context::{ToolContext, ToolLimits};
pub use error::ToolError;
pub use escalate::EscalateToHumanTool;
pub use fetch_articles::FetchArticlesTool;
pub use knowledge_base::KnowledgeBaseTool;
pub use middleware::dispatch_with_tracing;
pub use registry::{ToolDyn, ToolRegistry};
pub use search_articles::SearchArticlesTool;

use std::sync::Arc;

/// Build a [`ToolRegistry`] with all four tools registered, the standard
/// wiring every deployment of this assistant uses.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(KnowledgeBaseTool));
    registry.register(Arc::new(FetchArticlesTool));
    registry.register(Arc::new(SearchArticlesTool));
    registry.register(Arc::new(EscalateToHumanTool));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_all_four_tools() {
        let registry = default_registry();
        assert_eq!(registry.len(), 4);
        for name in [
            "knowledge_base",
            "fetch_articles",
            "search_articles",
            "escalate_to_human",
        ] {
            assert!(registry.get(name).is_some(), "missing tool {name}");
        }
    }

    #[test]
    fn schemas_round_trip_every_tool_name() {
        let registry = default_registry();
        let schemas = registry.schemas();
        assert_eq!(schemas.len(), 4);
    }
}
