//! Errors from corpus store operations.

use thiserror::Error;

/// Errors a [`crate::CorpusStore`] implementation can return.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CorpusError {
    /// The underlying transport (HTTP, database driver) failed.
    #[error("retrieval failed: {0}")]
    RetrievalFailed(String),

    /// The call did not complete within its deadline.
    #[error("retrieval timed out after {0}ms")]
    Timeout(u64),

    /// Catch-all for errors not worth a dedicated variant.
    #[error("{0}")]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}
