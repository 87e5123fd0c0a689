//! Tool execution errors.

use thiserror::Error;

/// Errors from tool operations.
///
/// Mirrors the teacher's `neuron_tool::ToolError` shape: a not-found case
/// for registry lookups, an invalid-input case for malformed arguments,
/// an execution-failed case for downstream (corpus/provider) failures,
/// and a catch-all.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found in the registry.
    #[error("tool not found: {0}")]
    NotFound(String),

    /// The input provided to the tool was invalid.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Tool execution failed (corpus or provider error).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<lighthouse_corpus::CorpusError> for ToolError {
    fn from(err: lighthouse_corpus::CorpusError) -> Self {
        ToolError::ExecutionFailed(err.to_string())
    }
}

impl From<lighthouse_provider::ProviderError> for ToolError {
    fn from(err: lighthouse_provider::ProviderError) -> Self {
        ToolError::ExecutionFailed(err.to_string())
    }
}
