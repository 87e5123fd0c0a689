//! Errors from LM and embedding providers.

use thiserror::Error;

/// Errors from LM/embedding providers.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP or network request failed.
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// Provider rate-limited the request.
    #[error("rate limited")]
    RateLimited,

    /// Authentication/authorization failed.
    #[error("auth failed: {0}")]
    AuthFailed(String),

    /// The call did not complete within its deadline.
    #[error("timed out after {0}ms")]
    Timeout(u64),

    /// Could not parse the provider's response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Whether retrying this request might succeed. The agent loop does
    /// not retry LM tool-calls to completion (`spec.md` Non-goals), but
    /// callers one layer down (an HTTP client wrapper) may use this.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::RateLimited | ProviderError::RequestFailed(_))
    }
}
