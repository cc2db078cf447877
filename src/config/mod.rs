//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `SCHOLARMATCH_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::time::Duration;

use crate::store::DEFAULT_COLLECTION_NAME;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `SCHOLARMATCH_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Qdrant collection holding scholarship embeddings. Default: `scholarships`.
    pub collection: String,

    /// Base URL of the OpenAI-compatible embedding endpoint. Default: `http://localhost:8081`.
    pub embedder_url: String,

    /// Embedding model identifier. Default: `text-embedding-3-small`.
    pub embedder_model: String,

    /// Optional bearer token for the embedding endpoint.
    pub embedder_api_key: Option<String>,

    /// Chat model identifier used for reranking. Default: `gpt-4o-mini`.
    pub rerank_model: String,

    /// Per-call timeout for the embedder. Default: 10s.
    pub embed_timeout: Duration,

    /// Per-call timeout for candidate retrieval. Default: 5s.
    pub retrieve_timeout: Duration,

    /// Per-call timeout for the reranker. Default: 30s.
    pub rerank_timeout: Duration,

    /// TTL for cached rerank results. Default: 24h.
    pub rerank_cache_ttl: Duration,

    /// Max entries in the rerank cache. Default: `10_000`.
    pub rerank_cache_capacity: u64,

    /// Max retained telemetry events. Default: `200`.
    pub telemetry_capacity: usize,
}

/// Default Qdrant URL used when `SCHOLARMATCH_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default embedder URL used when `SCHOLARMATCH_EMBEDDER_URL` is not set.
pub const DEFAULT_EMBEDDER_URL: &str = "http://localhost:8081";

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            collection: DEFAULT_COLLECTION_NAME.to_string(),
            embedder_url: DEFAULT_EMBEDDER_URL.to_string(),
            embedder_model: "text-embedding-3-small".to_string(),
            embedder_api_key: None,
            rerank_model: "gpt-4o-mini".to_string(),
            embed_timeout: Duration::from_millis(10_000),
            retrieve_timeout: Duration::from_millis(5_000),
            rerank_timeout: Duration::from_millis(30_000),
            rerank_cache_ttl: Duration::from_secs(86_400),
            rerank_cache_capacity: 10_000,
            telemetry_capacity: 200,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "SCHOLARMATCH_PORT";
    const ENV_BIND_ADDR: &'static str = "SCHOLARMATCH_BIND_ADDR";
    const ENV_QDRANT_URL: &'static str = "SCHOLARMATCH_QDRANT_URL";
    const ENV_COLLECTION: &'static str = "SCHOLARMATCH_COLLECTION";
    const ENV_EMBEDDER_URL: &'static str = "SCHOLARMATCH_EMBEDDER_URL";
    const ENV_EMBEDDER_MODEL: &'static str = "SCHOLARMATCH_EMBEDDER_MODEL";
    const ENV_EMBEDDER_API_KEY: &'static str = "SCHOLARMATCH_EMBEDDER_API_KEY";
    const ENV_RERANK_MODEL: &'static str = "SCHOLARMATCH_RERANK_MODEL";
    const ENV_EMBED_TIMEOUT_MS: &'static str = "SCHOLARMATCH_EMBED_TIMEOUT_MS";
    const ENV_RETRIEVE_TIMEOUT_MS: &'static str = "SCHOLARMATCH_RETRIEVE_TIMEOUT_MS";
    const ENV_RERANK_TIMEOUT_MS: &'static str = "SCHOLARMATCH_RERANK_TIMEOUT_MS";
    const ENV_RERANK_CACHE_TTL_SECS: &'static str = "SCHOLARMATCH_RERANK_CACHE_TTL_SECS";
    const ENV_RERANK_CACHE_CAPACITY: &'static str = "SCHOLARMATCH_RERANK_CACHE_CAPACITY";
    const ENV_TELEMETRY_CAPACITY: &'static str = "SCHOLARMATCH_TELEMETRY_CAPACITY";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let collection = Self::parse_string_from_env(Self::ENV_COLLECTION, defaults.collection);
        let embedder_url =
            Self::parse_string_from_env(Self::ENV_EMBEDDER_URL, defaults.embedder_url);
        let embedder_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDER_MODEL, defaults.embedder_model);
        let embedder_api_key = Self::parse_optional_string_from_env(Self::ENV_EMBEDDER_API_KEY);
        let rerank_model =
            Self::parse_string_from_env(Self::ENV_RERANK_MODEL, defaults.rerank_model);
        let embed_timeout =
            Self::parse_millis_from_env(Self::ENV_EMBED_TIMEOUT_MS, defaults.embed_timeout);
        let retrieve_timeout =
            Self::parse_millis_from_env(Self::ENV_RETRIEVE_TIMEOUT_MS, defaults.retrieve_timeout);
        let rerank_timeout =
            Self::parse_millis_from_env(Self::ENV_RERANK_TIMEOUT_MS, defaults.rerank_timeout);
        let rerank_cache_ttl = Self::parse_secs_from_env(
            Self::ENV_RERANK_CACHE_TTL_SECS,
            defaults.rerank_cache_ttl,
        );
        let rerank_cache_capacity = Self::parse_u64_from_env(
            Self::ENV_RERANK_CACHE_CAPACITY,
            defaults.rerank_cache_capacity,
        );
        let telemetry_capacity = Self::parse_u64_from_env(
            Self::ENV_TELEMETRY_CAPACITY,
            defaults.telemetry_capacity as u64,
        ) as usize;

        Ok(Self {
            port,
            bind_addr,
            qdrant_url,
            collection,
            embedder_url,
            embedder_model,
            embedder_api_key,
            rerank_model,
            embed_timeout,
            retrieve_timeout,
            rerank_timeout,
            rerank_cache_ttl,
            rerank_cache_capacity,
            telemetry_capacity,
        })
    }

    /// Validates basic invariants (does not probe endpoints).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl {
                setting: "qdrant_url",
            });
        }
        if self.embedder_url.trim().is_empty() {
            return Err(ConfigError::EmptyUrl {
                setting: "embedder_url",
            });
        }
        if self.rerank_cache_capacity == 0 {
            return Err(ConfigError::ZeroCapacity {
                setting: "rerank_cache_capacity",
            });
        }
        if self.telemetry_capacity == 0 {
            return Err(ConfigError::ZeroCapacity {
                setting: "telemetry_capacity",
            });
        }
        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_millis_from_env(var_name: &str, default: Duration) -> Duration {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(default)
    }

    fn parse_secs_from_env(var_name: &str, default: Duration) -> Duration {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(default)
    }
}
