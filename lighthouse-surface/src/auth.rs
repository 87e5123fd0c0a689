//! Bearer-token authentication (`spec.md` §4.8).
//!
//! Two kinds of token, resolved in order: database-issued tokens
//! (prefix `lp_`, stored as a SHA-256 hash and looked up by hash) and
//! static configuration keys (compared under a constant-time equality
//! primitive). Grounded in `surrealdb-core`'s `iam/signin.rs`, which
//! compares a signin key to a stored grant key via
//! `grant_key_bytes.ct_eq(signin_key_bytes)` rather than `==`.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::header;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

use crate::error::ApiError;

const DB_TOKEN_PREFIX: &str = "lp_";

/// A database-issued key record, looked up by the SHA-256 hash of the
/// raw token.
#[derive(Debug, Clone)]
pub struct IssuedKey {
    /// Stable identifier for this key, independent of the raw token.
    pub key_id: String,
    /// Human-readable name shown in audit logs.
    pub key_name: String,
    /// The user this key was issued to, if any (service keys may have
    /// none).
    pub user_id: Option<String>,
}

/// A single static configuration key: the raw secret plus the identity
/// it authenticates as.
#[derive(Debug, Clone)]
pub struct StaticKey {
    /// The raw secret value, compared byte-wise in constant time.
    pub secret: String,
    /// Stable identifier for this key.
    pub key_id: String,
    /// Human-readable name shown in audit logs.
    pub key_name: String,
}

/// The identity attached to a request after a successful auth check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    /// Stable identifier for the key used.
    pub key_id: String,
    /// Human-readable name of the key.
    pub key_name: String,
    /// The authenticated user, if the key is tied to one.
    pub user_id: Option<String>,
}

/// Holds both token populations and performs the lookup spec.md §4.8
/// describes. DB-issued keys are indexed by the hash of the raw token;
/// static keys are checked one by one under constant time, without
/// early exit, so that auth failure latency does not depend on how many
/// static keys are configured or which one (if any) nearly matched.
pub struct ApiKeyStore {
    by_hash: RwLock<HashMap<String, IssuedKey>>,
    static_keys: Vec<StaticKey>,
}

impl ApiKeyStore {
    /// Build a store from a set of database-issued keys (raw token,
    /// record) and a set of static configuration keys.
    pub fn new(issued: Vec<(String, IssuedKey)>, static_keys: Vec<StaticKey>) -> Self {
        let by_hash = issued
            .into_iter()
            .map(|(raw_token, record)| (hash_token(&raw_token), record))
            .collect();
        Self {
            by_hash: RwLock::new(by_hash),
            static_keys,
        }
    }

    /// An empty store: every request is unauthenticated.
    pub fn empty() -> Self {
        Self {
            by_hash: RwLock::new(HashMap::new()),
            static_keys: Vec::new(),
        }
    }

    /// Insert or replace a database-issued key, keyed by the hash of its
    /// raw token.
    pub async fn upsert_issued(&self, raw_token: &str, record: IssuedKey) {
        self.by_hash.write().await.insert(hash_token(raw_token), record);
    }

    /// Resolve a raw bearer token to an [`AuthIdentity`], or `None` if it
    /// matches neither population.
    pub async fn authenticate(&self, token: &str) -> Option<AuthIdentity> {
        if token.starts_with(DB_TOKEN_PREFIX) {
            let hash = hash_token(token);
            let by_hash = self.by_hash.read().await;
            if let Some(record) = by_hash.get(&hash) {
                return Some(AuthIdentity {
                    key_id: record.key_id.clone(),
                    key_name: record.key_name.clone(),
                    user_id: record.user_id.clone(),
                });
            }
            return None;
        }

        let mut matched: Option<&StaticKey> = None;
        for candidate in &self.static_keys {
            let ok: bool = candidate.secret.as_bytes().ct_eq(token.as_bytes()).into();
            if ok {
                matched = Some(candidate);
            }
        }
        matched.map(|key| AuthIdentity {
            key_id: key.key_id.clone(),
            key_name: key.key_name.clone(),
            user_id: None,
        })
    }
}

fn hash_token(raw_token: &str) -> String {
    let digest = Sha256::digest(raw_token.as_bytes());
    hex_encode(&digest)
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

/// Axum extractor pulling a [`AuthIdentity`] out of the `Authorization`
/// header, authenticating against `AppState::api_keys`.
pub struct BearerAuth(pub AuthIdentity);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    crate::state::AppState: axum::extract::FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = crate::state::AppState::from_ref(state);

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?
            .trim();

        if token.is_empty() {
            return Err(ApiError::Unauthorized);
        }

        match app_state.api_keys.authenticate(token).await {
            Some(identity) => Ok(BearerAuth(identity)),
            None => Err(ApiError::Unauthorized),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issued(raw: &str, key_id: &str) -> (String, IssuedKey) {
        (
            raw.to_string(),
            IssuedKey {
                key_id: key_id.to_string(),
                key_name: "ci key".to_string(),
                user_id: Some("u1".to_string()),
            },
        )
    }

    #[tokio::test]
    async fn authenticates_known_db_issued_token() {
        let store = ApiKeyStore::new(vec![issued("lp_abc123", "k1")], vec![]);
        let identity = store.authenticate("lp_abc123").await.unwrap();
        assert_eq!(identity.key_id, "k1");
        assert_eq!(identity.user_id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn rejects_unknown_db_issued_token() {
        let store = ApiKeyStore::new(vec![issued("lp_abc123", "k1")], vec![]);
        assert!(store.authenticate("lp_doesnotexist").await.is_none());
    }

    #[tokio::test]
    async fn authenticates_static_key() {
        let store = ApiKeyStore::new(
            vec![],
            vec![StaticKey {
                secret: "static-secret".to_string(),
                key_id: "static1".to_string(),
                key_name: "ops".to_string(),
            }],
        );
        let identity = store.authenticate("static-secret").await.unwrap();
        assert_eq!(identity.key_id, "static1");
        assert!(identity.user_id.is_none());
    }

    #[tokio::test]
    async fn rejects_wrong_static_key() {
        let store = ApiKeyStore::new(
            vec![],
            vec![StaticKey {
                secret: "static-secret".to_string(),
                key_id: "static1".to_string(),
                key_name: "ops".to_string(),
            }],
        );
        assert!(store.authenticate("wrong").await.is_none());
    }

    #[tokio::test]
    async fn empty_store_rejects_everything() {
        let store = ApiKeyStore::empty();
        assert!(store.authenticate("anything").await.is_none());
    }
}
