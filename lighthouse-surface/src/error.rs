//! The surface's HTTP-facing error type.
//!
//! Only four of [`GroundingError`]'s variants ever become an HTTP error
//! status: `Validation` (400), `Unauthorized` (401), `RateLimitExceeded`
//! (429), `Internal` (500). `RetrievalFailed`, `SynthesisFailed`, and
//! `CitationGateFailed` never reach this type — the pipeline absorbs
//! them into a normal `200` response carrying a canned fallback and
//! `confidence = needs_clarification` (`spec.md` §6, §7).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lighthouse_types::GroundingError;
use serde::Serialize;

/// The JSON body returned alongside any non-2xx response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Stable machine-readable error code.
    pub code: &'static str,
    /// Human-readable message, safe to show to a caller.
    pub message: String,
}

/// HTTP-facing error, distinct from [`GroundingError`] because it only
/// ever holds the four variants the REST contract maps to a status
/// code.
#[derive(Debug)]
pub enum ApiError {
    /// `400` — the request body failed validation.
    Validation(String),
    /// `401` — missing or invalid bearer token.
    Unauthorized,
    /// `429` — the caller's rate-limit bucket is exhausted.
    RateLimitExceeded {
        /// Seconds the caller should wait before retrying.
        retry_after_secs: u64,
        /// Configured maximum for the window.
        limit: u32,
        /// Requests remaining in the current window (always `0` here).
        remaining: u32,
        /// Seconds until the window resets.
        reset_in_secs: u64,
    },
    /// `500` — anything unexpected. Detail is logged, never shown.
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::Unauthorized => "unauthorized",
            ApiError::RateLimitExceeded { .. } => "rate_limit_exceeded",
            ApiError::Internal(_) => "internal_error",
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Validation(detail) => detail.clone(),
            ApiError::Unauthorized => "missing or invalid credentials".to_string(),
            ApiError::RateLimitExceeded { retry_after_secs, .. } => {
                format!("rate limit exceeded, retry after {retry_after_secs}s")
            }
            ApiError::Internal(_) => "internal error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!(detail = %detail, "internal error");
        }

        let status = self.status();
        let body = ErrorBody {
            code: self.code(),
            message: self.public_message(),
        };

        let mut response = (status, Json(body)).into_response();
        if let ApiError::RateLimitExceeded {
            retry_after_secs,
            limit,
            remaining,
            reset_in_secs,
        } = &self
        {
            let headers = response.headers_mut();
            if let Ok(value) = retry_after_secs.to_string().parse() {
                headers.insert("Retry-After", value);
            }
            if let Ok(value) = limit.to_string().parse() {
                headers.insert("X-RateLimit-Limit", value);
            }
            if let Ok(value) = remaining.to_string().parse() {
                headers.insert("X-RateLimit-Remaining", value);
            }
            if let Ok(value) = reset_in_secs.to_string().parse() {
                headers.insert("X-RateLimit-Reset", value);
            }
        }
        response
    }
}

impl From<GroundingError> for ApiError {
    /// Only reached for the four variants that can legitimately appear
    /// outside the pipeline (auth middleware, request validation). If a
    /// `RetrievalFailed`/`SynthesisFailed`/`CitationGateFailed` ever
    /// arrives here it is a programming error in the caller, not a
    /// request outcome — it is folded into `Internal` rather than
    /// panicking.
    fn from(error: GroundingError) -> Self {
        match error {
            GroundingError::Validation(detail) => ApiError::Validation(detail),
            GroundingError::Unauthorized => ApiError::Unauthorized,
            GroundingError::RateLimitExceeded { retry_after_secs } => ApiError::RateLimitExceeded {
                retry_after_secs,
                limit: 0,
                remaining: 0,
                reset_in_secs: retry_after_secs,
            },
            other => ApiError::Internal(other.to_string()),
        }
    }
}
