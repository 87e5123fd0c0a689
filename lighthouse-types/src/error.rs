//! Stable error taxonomy for the pipeline.
//!
//! Every crate below the surface returns its own `thiserror` enum
//! (`CorpusError`, `ProviderError`, `ToolError`, ...). [`GroundingError`]
//! is the one enum the surface matches on to pick an HTTP status and a
//! stable error code (`spec.md` §7); per-crate errors convert into it with
//! `From`, the same way `layer0::error::OrchError` folds `OperatorError`
//! in with `#[from]`.

use thiserror::Error;

/// Stable error code surfaced to clients and logs.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GroundingError {
    /// A corpus store or manifest fetch failed or timed out.
    #[error("retrieval failed: {0}")]
    RetrievalFailed(String),

    /// The final synthesis call failed or timed out.
    #[error("synthesis failed: {0}")]
    SynthesisFailed(String),

    /// The citation gate rejected the synthesized answer.
    #[error("citation gate failed: {reason}")]
    CitationGateFailed {
        /// Machine-readable failure reason (`invalid_citation`,
        /// `no_evidence_for_functional_claim`).
        reason: String,
        /// Citation refs that failed validation, if any.
        bad_refs: Vec<String>,
    },

    /// Request body failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Caller is not authenticated.
    #[error("unauthorized")]
    Unauthorized,

    /// Caller exceeded their rate limit.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimitExceeded {
        /// Seconds the caller should wait before retrying.
        retry_after_secs: u64,
    },

    /// Anything else. Logged with full detail, never shown to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GroundingError {
    /// The stable machine-readable code for this error, used in the
    /// response body and in logs.
    pub fn code(&self) -> &'static str {
        match self {
            GroundingError::RetrievalFailed(_) => "retrieval_failed",
            GroundingError::SynthesisFailed(_) => "synthesis_failed",
            GroundingError::CitationGateFailed { .. } => "citation_gate_failed",
            GroundingError::Validation(_) => "validation_error",
            GroundingError::Unauthorized => "unauthorized",
            GroundingError::RateLimitExceeded { .. } => "rate_limit_exceeded",
            GroundingError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(GroundingError::Unauthorized.code(), "unauthorized");
        assert_eq!(
            GroundingError::RateLimitExceeded {
                retry_after_secs: 5
            }
            .code(),
            "rate_limit_exceeded"
        );
        assert_eq!(
            GroundingError::CitationGateFailed {
                reason: "invalid_citation".into(),
                bad_refs: vec!["x".into()]
            }
            .code(),
            "citation_gate_failed"
        );
    }
}
