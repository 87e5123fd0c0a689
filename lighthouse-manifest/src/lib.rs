#![deny(missing_docs)]
//! Read-through cache over the hierarchy manifest (`spec.md` §4.2).
//!
//! The manifest is an opaque text blob authored outside the system; the
//! core only ever sees its textual form, memoized behind a TTL. Grounded
//! in `neuron-state-memory`'s `RwLock`-guarded map — the same
//! single-writer-at-a-time, no-suspension-inside-the-lock discipline
//! `spec.md` §5 requires of all process-local caches.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors fetching the hierarchy manifest from its source.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The source could not be reached or returned a non-success status.
    #[error("manifest fetch failed: {0}")]
    FetchFailed(String),
}

/// Where the raw manifest text comes from. The production implementation
/// fetches an HTTP URL; tests use a fixed-string source.
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Fetch the current manifest text.
    async fn fetch(&self) -> Result<String, ManifestError>;
}

/// Fetches the manifest over HTTP from a configured URL.
pub struct HttpManifestSource {
    url: String,
    client: reqwest::Client,
}

impl HttpManifestSource {
    /// Create a source pointed at `url`, using a fresh HTTP client.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ManifestSource for HttpManifestSource {
    async fn fetch(&self) -> Result<String, ManifestError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| ManifestError::FetchFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ManifestError::FetchFailed(format!(
                "manifest source returned {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| ManifestError::FetchFailed(e.to_string()))
    }
}

/// A fixed-string manifest source, for tests and offline fixtures.
pub struct StaticManifestSource(pub String);

#[async_trait]
impl ManifestSource for StaticManifestSource {
    async fn fetch(&self) -> Result<String, ManifestError> {
        Ok(self.0.clone())
    }
}

struct CachedManifest {
    text: String,
    fetched_at: Instant,
}

/// Memoizing cache over a [`ManifestSource`].
///
/// On first call, fetches and caches for `ttl`. On fetch failure, serves
/// the previously cached value if present, otherwise the empty string.
/// `invalidate` is the external hook a corpus-update notification calls
/// to force the next `get_hierarchy` to refetch.
pub struct ManifestCache {
    source: Box<dyn ManifestSource>,
    ttl: Duration,
    cached: RwLock<Option<CachedManifest>>,
}

impl ManifestCache {
    /// Create a cache over `source` with the given TTL.
    pub fn new(source: Box<dyn ManifestSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cached: RwLock::new(None),
        }
    }

    /// Return the current hierarchy manifest text, fetching or serving
    /// from cache as needed. Never returns an error: a fetch failure
    /// falls back to the stale value, or `""` if nothing has ever been
    /// cached.
    pub async fn get_hierarchy(&self) -> String {
        {
            let cached = self.cached.read().await;
            if let Some(entry) = cached.as_ref() {
                if entry.fetched_at.elapsed() < self.ttl {
                    return entry.text.clone();
                }
            }
        }

        match self.source.fetch().await {
            Ok(text) => {
                let mut cached = self.cached.write().await;
                *cached = Some(CachedManifest {
                    text: text.clone(),
                    fetched_at: Instant::now(),
                });
                text
            }
            Err(err) => {
                tracing::warn!(error = %err, "manifest fetch failed, serving stale cache");
                let cached = self.cached.read().await;
                cached
                    .as_ref()
                    .map(|entry| entry.text.clone())
                    .unwrap_or_default()
            }
        }
    }

    /// Clear the cache, forcing the next `get_hierarchy` call to refetch.
    pub async fn invalidate(&self) {
        let mut cached = self.cached.write().await;
        *cached = None;
    }
}
