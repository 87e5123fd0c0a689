//! Startup configuration (`spec.md` §6): every field is read from a TOML
//! file, then overridden by an environment variable of the same name
//! upper-cased and prefixed `LIGHTHOUSE_`. Missing required fields abort
//! startup with every missing name collected into one error, not just
//! the first — grounded in the teacher's `BrainConfig::from_path`
//! (`brain/src/config.rs`) TOML-file-plus-defaults loading shape,
//! generalized to also collect env overrides and missing-field errors.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// One configured API key (`spec.md` §6 `api_keys: [{id, name, secret}]`).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeyConfig {
    /// Stable key id.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// The raw secret, compared in constant time.
    pub secret: String,
}

/// Raw, partially-optional configuration as loaded from TOML, before
/// required-field validation (`spec.md` §6).
#[derive(Debug, Default, Deserialize)]
pub struct RawConfig {
    pub chat_model: Option<String>,
    pub embedding_model: Option<String>,
    pub embedding_dimensions: Option<usize>,
    pub min_similarity: Option<f32>,
    pub max_turns: Option<u32>,
    pub max_fetch_paths: Option<usize>,
    pub manifest_ttl_secs: Option<u64>,
    pub conversation_cache_ttl_secs: Option<u64>,
    pub rate_limit_window_secs: Option<u64>,
    pub rate_limit_max: Option<u32>,
    pub allowed_origins: Option<Vec<String>>,
    pub api_keys: Option<Vec<ApiKeyConfig>>,
    pub store_connection: Option<String>,
    pub lm_credentials: Option<String>,
    pub manifest_source_url: Option<String>,
    pub bind_addr: Option<String>,
}

impl RawConfig {
    fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("LIGHTHOUSE_LM_CREDENTIALS") {
            self.lm_credentials = Some(v);
        }
        if let Ok(v) = std::env::var("LIGHTHOUSE_MANIFEST_SOURCE_URL") {
            self.manifest_source_url = Some(v);
        }
        if let Ok(v) = std::env::var("LIGHTHOUSE_STORE_CONNECTION") {
            self.store_connection = Some(v);
        }
        if let Ok(v) = std::env::var("LIGHTHOUSE_BIND_ADDR") {
            self.bind_addr = Some(v);
        }
        self
    }
}

/// Fully resolved, validated startup configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub chat_model: String,
    pub embedding_model: String,
    pub embedding_dimensions: usize,
    pub min_similarity: f32,
    pub max_turns: u32,
    pub max_fetch_paths: usize,
    pub manifest_ttl: Duration,
    pub conversation_cache_ttl: Duration,
    pub rate_limit_window: Duration,
    pub rate_limit_max: u32,
    pub allowed_origins: Vec<String>,
    pub api_keys: Vec<ApiKeyConfig>,
    pub store_connection: String,
    pub lm_credentials: String,
    pub manifest_source_url: String,
    pub bind_addr: String,
}

/// Failure to produce a complete [`Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid TOML.
    #[error("invalid config TOML: {0}")]
    Parse(String),
    /// One or more required settings were missing after merging file and
    /// environment sources. Names every missing field, not just the
    /// first, so an operator fixes the config in one pass.
    #[error("missing required configuration fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
}

impl Config {
    /// Load configuration from a TOML file at `path`, apply environment
    /// overrides, then validate that every required field is present.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let raw = RawConfig::from_toml_str(&text)?.apply_env_overrides();
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Self, ConfigError> {
        let mut missing = Vec::new();

        macro_rules! require {
            ($field:expr, $name:literal) => {
                match $field {
                    Some(value) => value,
                    None => {
                        missing.push($name.to_string());
                        Default::default()
                    }
                }
            };
        }

        let chat_model = require!(raw.chat_model, "chat_model");
        let embedding_model = require!(raw.embedding_model, "embedding_model");
        let embedding_dimensions = require!(raw.embedding_dimensions, "embedding_dimensions");
        let lm_credentials = require!(raw.lm_credentials, "lm_credentials");
        let manifest_source_url = require!(raw.manifest_source_url, "manifest_source_url");
        let store_connection = require!(raw.store_connection, "store_connection");

        if lm_credentials.is_empty() && !missing.contains(&"lm_credentials".to_string()) {
            missing.push("lm_credentials".to_string());
        }

        if !missing.is_empty() {
            return Err(ConfigError::MissingFields(missing));
        }

        Ok(Config {
            chat_model,
            embedding_model,
            embedding_dimensions,
            min_similarity: raw.min_similarity.unwrap_or(0.15),
            max_turns: raw.max_turns.unwrap_or(8),
            max_fetch_paths: raw.max_fetch_paths.unwrap_or(15),
            manifest_ttl: Duration::from_secs(raw.manifest_ttl_secs.unwrap_or(300)),
            conversation_cache_ttl: Duration::from_secs(raw.conversation_cache_ttl_secs.unwrap_or(86_400)),
            rate_limit_window: Duration::from_secs(raw.rate_limit_window_secs.unwrap_or(60)),
            rate_limit_max: raw.rate_limit_max.unwrap_or(60),
            allowed_origins: raw.allowed_origins.unwrap_or_default(),
            api_keys: raw.api_keys.unwrap_or_default(),
            store_connection,
            lm_credentials,
            manifest_source_url,
            bind_addr: raw.bind_addr.unwrap_or_else(|| "0.0.0.0:8080".to_string()),
        })
    }

    /// Pinned `(chat_model, embedding_model, dimensions)` string stamped
    /// into every answer's provenance (`spec.md` §4.9).
    pub fn pipeline_version(&self, chunker_id: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.chat_model, self.embedding_model, self.embedding_dimensions, chunker_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_toml() -> &'static str {
        r#"
            chat_model = "claude-sonnet-4-20250514"
            embedding_model = "voyage-3"
            embedding_dimensions = 1024
            lm_credentials = "sk-test"
            manifest_source_url = "https://example.com/manifest.txt"
            store_connection = "postgres://localhost/corpus"
        "#
    }

    #[test]
    fn loads_complete_config() {
        let raw = RawConfig::from_toml_str(complete_toml()).unwrap();
        let config = Config::from_raw(raw).unwrap();
        assert_eq!(config.chat_model, "claude-sonnet-4-20250514");
        assert_eq!(config.rate_limit_max, 60);
    }

    #[test]
    fn reports_every_missing_required_field() {
        let raw = RawConfig::from_toml_str("chat_model = \"x\"").unwrap();
        let err = Config::from_raw(raw).unwrap_err();
        match err {
            ConfigError::MissingFields(fields) => {
                assert!(fields.contains(&"embedding_model".to_string()));
                assert!(fields.contains(&"lm_credentials".to_string()));
                assert!(fields.contains(&"manifest_source_url".to_string()));
                assert!(fields.contains(&"store_connection".to_string()));
                assert!(fields.len() >= 4, "expected every missing field collected, got {fields:?}");
            }
            other => panic!("expected MissingFields, got {other:?}"),
        }
    }

    #[test]
    fn defaults_fill_in_optional_fields() {
        let raw = RawConfig::from_toml_str(complete_toml()).unwrap();
        let config = Config::from_raw(raw).unwrap();
        assert_eq!(config.max_turns, 8);
        assert_eq!(config.manifest_ttl, Duration::from_secs(300));
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn pipeline_version_pins_model_triple() {
        let raw = RawConfig::from_toml_str(complete_toml()).unwrap();
        let config = Config::from_raw(raw).unwrap();
        assert_eq!(
            config.pipeline_version("chunker-v1"),
            "claude-sonnet-4-20250514/voyage-3/1024/chunker-v1"
        );
    }
}
