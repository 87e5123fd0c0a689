//! The `POST /ask` / `GET /health` REST surface (`spec.md` §6).
//!
//! Grounded in `mira-chat`'s `create_router`/`AppState` pattern (CORS
//! layer, `State<AppState>` extractor, `axum::serve`) and `reflex`'s
//! gateway handler (`#[instrument]` on the request handler, a custom
//! error type implementing `IntoResponse`).

use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderValue, Method};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::BearerAuth;
use crate::error::ApiError;
use crate::pipeline::{run_pipeline, PipelineRequest};
use crate::request_id::resolve_request_id;
use crate::state::AppState;
use crate::validation::{validate, AskBody};
use lighthouse_cache::RateLimitOutcome;
use lighthouse_types::{RequestId, ThreadKey};

/// Build the router with every route, CORS, and tracing wired in. The
/// auth + rate-limit middleware runs as an `axum::middleware::from_fn`
/// layer rather than inside each handler, so both endpoints share one
/// enforcement path. The request-id layer is outermost so every
/// response — `/ask`, `/health`, and every `ApiError` rejection alike —
/// carries `X-Request-Id` (`spec.md` §6), and inner layers/handlers can
/// read the resolved id back out of the request extensions instead of
/// re-parsing the header.
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer(&state.allowed_origins);

    Router::new()
        .route("/ask", post(ask_handler))
        .route("/health", get(health_handler))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Resolve the request id from `X-Request-Id` (or generate one), stash it
/// in the request extensions for handlers and other middleware to read,
/// and stamp it onto the outgoing response regardless of status.
async fn request_id_middleware(mut request: axum::extract::Request, next: Next) -> Response {
    let request_id = resolve_request_id(
        request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
    );
    request.extensions_mut().insert(request_id.clone());

    let mut response = next.run(request).await;
    if let Ok(value) = request_id.to_string().parse() {
        response.headers_mut().insert("X-Request-Id", value);
    }
    response
}

fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::HeaderName::from_static("x-request-id"),
        ]);

    if allowed_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    layer.allow_origin(origins)
}

/// Rate-limit enforcement, applied before the handler runs. Identity is
/// the authenticated key id when present, else the client address
/// (`spec.md` §4.8). Since auth itself happens inside the handler via
/// the `BearerAuth` extractor, this middleware re-derives identity by
/// authenticating the raw header itself rather than duplicating the
/// extractor's rejection behavior — an unauthenticated or wrongly
/// authenticated caller still gets its own bucket keyed by peer address,
/// so a flood of bad tokens from one source cannot exhaust the shared
/// pool of every other unauthenticated caller.
async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: axum::extract::Request,
    next: Next,
) -> Response {
    let identity = resolve_rate_limit_identity(&state, request.headers(), peer).await;

    match state.rate_limiter.check(&identity).await {
        RateLimitOutcome::Allowed(status) => {
            let mut response = next.run(request).await;
            insert_rate_limit_headers(&mut response, status.limit, status.remaining, status.reset_in_secs);
            response
        }
        RateLimitOutcome::Exceeded { retry_after_secs, limit } => {
            ApiError::RateLimitExceeded {
                retry_after_secs,
                limit,
                remaining: 0,
                reset_in_secs: retry_after_secs,
            }
            .into_response()
        }
    }
}

/// `key_id` of the bearer token if it authenticates against
/// `AppState::api_keys`, else the peer's IP address.
async fn resolve_rate_limit_identity(
    state: &AppState,
    headers: &axum::http::HeaderMap,
    peer: SocketAddr,
) -> String {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    if let Some(token) = token {
        if let Some(identity) = state.api_keys.authenticate(token).await {
            return identity.key_id;
        }
    }

    peer.ip().to_string()
}

fn insert_rate_limit_headers(response: &mut Response, limit: u32, remaining: u32, reset_in_secs: u64) {
    let headers = response.headers_mut();
    if let Ok(v) = limit.to_string().parse() {
        headers.insert("X-RateLimit-Limit", v);
    }
    if let Ok(v) = remaining.to_string().parse() {
        headers.insert("X-RateLimit-Remaining", v);
    }
    if let Ok(v) = reset_in_secs.to_string().parse() {
        headers.insert("X-RateLimit-Reset", v);
    }
}

/// Response body for `POST /ask` (`spec.md` §4.8, §6).
#[derive(Debug, Serialize)]
struct AskResponse {
    request_id: String,
    answer: AnswerBody,
    metadata: MetadataBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    evidence: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    escalation: Option<lighthouse_types::EscalationDraft>,
}

#[derive(Debug, Serialize)]
struct AnswerBody {
    summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detailed_answer: Option<String>,
    confidence: lighthouse_types::Confidence,
}

#[derive(Debug, Serialize)]
struct MetadataBody {
    mode: lighthouse_types::RouteMode,
    latency_ms: u64,
    pipeline_version: String,
}

#[tracing::instrument(skip(state, body), fields(question_len = body.question.len()))]
async fn ask_handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    BearerAuth(identity): BearerAuth,
    Json(body): Json<AskBody>,
) -> Result<Response, ApiError> {
    validate(&body).map_err(ApiError::from)?;

    let thread_key = identity
        .user_id
        .clone()
        .map(ThreadKey::new)
        .unwrap_or_else(|| ThreadKey::new(identity.key_id.clone()));

    let include_evidence = body.options.include_evidence;
    let pipeline_request = PipelineRequest {
        question: body.question,
        conversation_history: body.conversation_history,
        options: body.options,
        thread_key,
    };

    let answer = run_pipeline(&state, request_id.clone(), pipeline_request).await;

    let response_body = AskResponse {
        request_id: request_id.to_string(),
        answer: AnswerBody {
            summary: answer.summary,
            detailed_answer: answer.detailed_answer,
            confidence: answer.confidence,
        },
        metadata: MetadataBody {
            mode: answer.provenance.mode,
            latency_ms: answer.provenance.latency_ms,
            pipeline_version: answer.provenance.pipeline_version,
        },
        evidence: include_evidence.then(|| answer.evidence_paths.clone()),
        escalation: answer.escalation,
    };

    Ok(Json(response_body).into_response())
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: String,
    timestamp: String,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: state.pipeline_version.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
