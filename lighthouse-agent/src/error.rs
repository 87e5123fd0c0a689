//! Errors from driving the agent loop or running final synthesis.

use lighthouse_provider::ProviderError;
use thiserror::Error;

/// Errors surfaced by [`crate::loop_::run_agent_loop`] and
/// [`crate::synthesis::run_synthesis`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AgentError {
    /// The provider call itself failed (not a tool failure).
    #[error("provider call failed: {0}")]
    Provider(#[from] ProviderError),

    /// Catch-all for other errors.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
