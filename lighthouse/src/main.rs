//! Process entrypoint: load configuration, wire every component into an
//! [`AppState`], bind the REST router, and serve until a shutdown signal
//! arrives.
//!
//! Grounded in the teacher's `brain-server` binary shape — load config,
//! build a tracing subscriber from `RUST_LOG`, construct shared state,
//! `axum::serve` with a `shutdown_signal` future racing SIGINT/SIGTERM.

mod config;

use config::Config;
use lighthouse_agent::{LoopConfig, SynthesisConfig};
use lighthouse_cache::{ConversationCache, FeedbackLog, RateLimitConfig, RateLimiter};
use lighthouse_corpus::{CorpusStore, MemoryCorpusStore};
use lighthouse_manifest::{HttpManifestSource, ManifestCache};
use lighthouse_provider::{AnthropicProvider, Provider};
use lighthouse_surface::auth::{ApiKeyStore, StaticKey};
use lighthouse_surface::{create_router, AppState, NoopNotifier};
use lighthouse_tool::ToolLimits;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "lighthouse.toml";
const CHUNKER_ID: &str = "chunker-v1";

#[tokio::main]
async fn main() {
    init_tracing();

    let config_path = std::env::var("LIGHTHOUSE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = match Config::load(&config_path) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(path = %config_path.display(), error = %error, "failed to load configuration");
            std::process::exit(1);
        }
    };

    let bind_addr = config.bind_addr.clone();
    let state = build_state(config);

    let router = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(addr = %bind_addr, error = %error, "failed to bind listener");
            std::process::exit(1);
        }
    };

    tracing::info!(addr = %bind_addr, "lighthouse listening");

    // Rate limiting keys on the peer address for unauthenticated callers
    // (`spec.md` §4.8), which axum only makes available to middleware via
    // `ConnectInfo` when the service is built with connect-info enabled.
    let app = router.into_make_service_with_connect_info::<SocketAddr>();

    if let Err(error) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %error, "server exited with error");
        std::process::exit(1);
    }
}

/// Assemble the shared [`AppState`] from a resolved [`Config`]. The
/// corpus store is in-memory until a real backend is wired in — `spec.md`
/// §4.1 treats it as an external collaborator the core only ever talks
/// to through [`CorpusStore`], so swapping `MemoryCorpusStore` for a
/// networked implementation touches only this function.
fn build_state(config: Config) -> AppState {
    let provider: Arc<dyn Provider> = Arc::new(
        AnthropicProvider::new(config.lm_credentials.clone())
            .chat_model(config.chat_model.clone())
            .embed_model(config.embedding_model.clone()),
    );

    let corpus: Arc<dyn CorpusStore> = Arc::new(MemoryCorpusStore::new());

    let manifest = Arc::new(ManifestCache::new(
        Box::new(HttpManifestSource::new(config.manifest_source_url.clone())),
        config.manifest_ttl,
    ));

    let static_keys: Vec<StaticKey> = config
        .api_keys
        .iter()
        .map(|key| StaticKey {
            secret: key.secret.clone(),
            key_id: key.id.clone(),
            key_name: key.name.clone(),
        })
        .collect();
    let api_keys = Arc::new(ApiKeyStore::new(Vec::new(), static_keys));

    let tool_limits = ToolLimits {
        max_fetch_paths: config.max_fetch_paths,
        min_similarity: config.min_similarity,
    };

    let loop_config = LoopConfig {
        max_turns: config.max_turns,
        ..LoopConfig::default()
    };

    let pipeline_version = config.pipeline_version(CHUNKER_ID);

    AppState {
        corpus,
        provider,
        manifest,
        tools: Arc::new(lighthouse_tool::default_registry()),
        conversations: Arc::new(ConversationCache::new(config.conversation_cache_ttl)),
        rate_limiter: Arc::new(RateLimiter::new(RateLimitConfig {
            window: config.rate_limit_window,
            max_requests: config.rate_limit_max,
        })),
        feedback: Arc::new(FeedbackLog::new()),
        api_keys,
        notifier: Arc::new(NoopNotifier),
        tool_limits,
        loop_config,
        synthesis_config: SynthesisConfig::default(),
        allowed_origins: config.allowed_origins,
        pipeline_version,
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

/// Resolves once SIGINT or (on unix) SIGTERM arrives, for graceful
/// shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
