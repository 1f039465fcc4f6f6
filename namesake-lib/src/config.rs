//! Process configuration
//!
//! Everything is read from the environment once at startup:
//!
//! | Variable                     | Default                   |
//! |------------------------------|---------------------------|
//! | `PINECONE_API_KEY`           | required                  |
//! | `PINECONE_INDEX_NAME`        | required                  |
//! | `PINECONE_CLOUD`             | `aws`                     |
//! | `PINECONE_REGION`            | `us-east-1`               |
//! | `PINECONE_CONTROLLER_URL`    | `https://api.pinecone.io` |
//! | `PINECONE_TIMEOUT_SECS`      | `30`                      |
//! | `PINECONE_UPSERT_BATCH_SIZE` | `100`                     |
//! | `NAMESAKE_DIMENSION`         | `384`                     |
//! | `NAMESAKE_TOP_K`             | `5`                       |
//! | `NAMESAKE_MODEL_CACHE_DIR`   | fastembed default         |
//!
//! The binary loads a `.env` file first, so these can live there too.

use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

use crate::store::IndexSpec;
use crate::{Error, Result};

/// Connection settings for the hosted index.
#[derive(Clone, Deserialize)]
pub struct PineconeConfig {
    /// API key sent as `Api-Key` on every request.
    #[serde(default)]
    pub api_key: String,

    /// Name of the index holding the names.
    #[serde(default)]
    pub index_name: String,

    /// Serverless cloud used when the index has to be created.
    #[serde(default = "default_cloud")]
    pub cloud: String,

    /// Serverless region used when the index has to be created.
    #[serde(default = "default_region")]
    pub region: String,

    /// Control plane base URL.
    #[serde(default = "default_controller_url")]
    pub controller_url: String,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum vectors per upsert request.
    #[serde(default = "default_upsert_batch_size")]
    pub upsert_batch_size: usize,

    /// How often to check a freshly created index for readiness.
    #[serde(default = "default_ready_poll_attempts")]
    pub ready_poll_attempts: u32,

    #[serde(default = "default_ready_poll_interval_ms")]
    pub ready_poll_interval_ms: u64,
}

impl Default for PineconeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            index_name: String::new(),
            cloud: default_cloud(),
            region: default_region(),
            controller_url: default_controller_url(),
            timeout_secs: default_timeout_secs(),
            upsert_batch_size: default_upsert_batch_size(),
            ready_poll_attempts: default_ready_poll_attempts(),
            ready_poll_interval_ms: default_ready_poll_interval_ms(),
        }
    }
}

impl fmt::Debug for PineconeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PineconeConfig")
            .field("api_key", &"<redacted>")
            .field("index_name", &self.index_name)
            .field("cloud", &self.cloud)
            .field("region", &self.region)
            .field("controller_url", &self.controller_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("upsert_batch_size", &self.upsert_batch_size)
            .finish_non_exhaustive()
    }
}

/// Settings for the matcher itself.
#[derive(Debug, Clone, Deserialize)]
struct MatcherSettings {
    #[serde(default = "default_dimension")]
    dimension: usize,
    #[serde(default = "default_top_k")]
    top_k: usize,
    #[serde(default)]
    model_cache_dir: Option<PathBuf>,
}

/// Full process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub pinecone: PineconeConfig,

    /// Vector size the index is created with. Must match the embedder.
    pub dimension: usize,

    /// Matches shown per interactive query.
    pub top_k: usize,

    /// Where fastembed keeps downloaded models.
    pub model_cache_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a required variable is missing or a value
    /// does not parse.
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }

    /// Load configuration from an explicit variable map instead of the
    /// process environment.
    pub fn from_vars(vars: config::Map<String, String>) -> Result<Self> {
        Self::load(Some(vars))
    }

    fn load(vars: Option<config::Map<String, String>>) -> Result<Self> {
        let pinecone: PineconeConfig = config::Config::builder()
            .add_source(config::Environment::with_prefix("PINECONE").source(vars.clone()))
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| Error::Config(format!("PINECONE_*: {e}")))?;

        let settings: MatcherSettings = config::Config::builder()
            .add_source(config::Environment::with_prefix("NAMESAKE").source(vars))
            .build()
            .and_then(config::Config::try_deserialize)
            .map_err(|e| Error::Config(format!("NAMESAKE_*: {e}")))?;

        let config = Self {
            pinecone,
            dimension: settings.dimension,
            top_k: settings.top_k,
            model_cache_dir: settings.model_cache_dir,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let required = [
            ("PINECONE_API_KEY", &self.pinecone.api_key),
            ("PINECONE_INDEX_NAME", &self.pinecone.index_name),
        ];
        for (var, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Config(format!("{var} is not set")));
            }
        }

        let positive = [
            ("NAMESAKE_DIMENSION", self.dimension),
            ("NAMESAKE_TOP_K", self.top_k),
            ("PINECONE_UPSERT_BATCH_SIZE", self.pinecone.upsert_batch_size),
        ];
        for (var, value) in positive {
            if value == 0 {
                return Err(Error::Config(format!("{var} must be greater than zero")));
            }
        }

        Ok(())
    }

    /// Shape of the index the names live in.
    pub fn index_spec(&self) -> IndexSpec {
        IndexSpec::cosine(self.pinecone.index_name.clone(), self.dimension)
    }
}

fn default_cloud() -> String {
    "aws".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_controller_url() -> String {
    "https://api.pinecone.io".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_upsert_batch_size() -> usize {
    100
}

fn default_ready_poll_attempts() -> u32 {
    60
}

fn default_ready_poll_interval_ms() -> u64 {
    1000
}

fn default_dimension() -> usize {
    384
}

fn default_top_k() -> usize {
    5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Metric;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("PINECONE_API_KEY", "pcsk-test"),
            ("PINECONE_INDEX_NAME", "names"),
        ]
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_vars(vars(&required())).unwrap();

        assert_eq!(cfg.pinecone.api_key, "pcsk-test");
        assert_eq!(cfg.pinecone.index_name, "names");
        assert_eq!(cfg.pinecone.cloud, "aws");
        assert_eq!(cfg.pinecone.region, "us-east-1");
        assert_eq!(cfg.pinecone.controller_url, "https://api.pinecone.io");
        assert_eq!(cfg.pinecone.upsert_batch_size, 100);
        assert_eq!(cfg.dimension, 384);
        assert_eq!(cfg.top_k, 5);
        assert!(cfg.model_cache_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let mut pairs = required();
        pairs.extend([
            ("PINECONE_REGION", "eu-west-1"),
            ("PINECONE_UPSERT_BATCH_SIZE", "50"),
            ("NAMESAKE_DIMENSION", "768"),
            ("NAMESAKE_TOP_K", "10"),
            ("NAMESAKE_MODEL_CACHE_DIR", "/tmp/models"),
        ]);
        let cfg = Config::from_vars(vars(&pairs)).unwrap();

        assert_eq!(cfg.pinecone.region, "eu-west-1");
        assert_eq!(cfg.pinecone.upsert_batch_size, 50);
        assert_eq!(cfg.dimension, 768);
        assert_eq!(cfg.top_k, 10);
        assert_eq!(cfg.model_cache_dir, Some(PathBuf::from("/tmp/models")));
    }

    #[test]
    fn test_missing_api_key() {
        let err = Config::from_vars(vars(&[("PINECONE_INDEX_NAME", "names")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("PINECONE_API_KEY")));
    }

    #[test]
    fn test_missing_index_name() {
        let err = Config::from_vars(vars(&[("PINECONE_API_KEY", "pcsk-test")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("PINECONE_INDEX_NAME")));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut pairs = required();
        pairs.push(("NAMESAKE_TOP_K", "0"));
        let err = Config::from_vars(vars(&pairs)).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("NAMESAKE_TOP_K")));
    }

    #[test]
    fn test_unparseable_dimension() {
        let mut pairs = required();
        pairs.push(("NAMESAKE_DIMENSION", "large"));
        let err = Config::from_vars(vars(&pairs)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_index_spec() {
        let cfg = Config::from_vars(vars(&required())).unwrap();
        let spec = cfg.index_spec();
        assert_eq!(spec.name, "names");
        assert_eq!(spec.dimension, 384);
        assert_eq!(spec.metric, Metric::Cosine);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let cfg = Config::from_vars(vars(&required())).unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("pcsk-test"));
    }
}
