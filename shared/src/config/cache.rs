//! Cache configuration module

use serde::{Deserialize, Serialize};

/// Redis cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in milliseconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_ms: u64,

    /// Per-operation response timeout in milliseconds
    #[serde(default = "default_response_timeout")]
    pub response_timeout_ms: u64,

    /// Maximum retry attempts for transient errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between retries in milliseconds (doubled each attempt)
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// Enable cache key prefix
    #[serde(default)]
    pub key_prefix: Option<String>,

    /// Redis database number (0-15)
    #[serde(default)]
    pub database: u8,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://localhost:6379"),
            connection_timeout_ms: default_connection_timeout(),
            response_timeout_ms: default_response_timeout(),
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay(),
            key_prefix: None,
            database: 0,
        }
    }
}

impl CacheConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let url = std::env::var("REDIS_URL")
            .unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let response_timeout_ms = std::env::var("REDIS_RESPONSE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_response_timeout);
        let key_prefix = std::env::var("REDIS_KEY_PREFIX").ok().filter(|p| !p.is_empty());

        Self {
            url,
            response_timeout_ms,
            key_prefix,
            ..Default::default()
        }
    }

    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the key prefix for all cache keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Set the database number
    pub fn with_database(mut self, db: u8) -> Self {
        self.database = db.min(15);
        self
    }

    /// Set the per-operation response timeout
    pub fn with_response_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.response_timeout_ms = timeout_ms;
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

/// In-memory entry store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MemoryCacheConfig {
    /// Number of shards in the concurrent map (0 lets the map decide)
    #[serde(default)]
    pub shard_amount: usize,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self { shard_amount: 0 }
    }
}

/// Entry store strategy configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheStrategyConfig {
    /// Store type (redis, memory)
    #[serde(default = "default_cache_type")]
    pub cache_type: CacheType,

    /// Redis configuration
    #[serde(default)]
    pub redis: Option<CacheConfig>,

    /// Memory store configuration
    #[serde(default)]
    pub memory: Option<MemoryCacheConfig>,
}

/// Cache type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    Redis,
    Memory,
}

impl std::str::FromStr for CacheType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(CacheType::Redis),
            "memory" | "in-memory" => Ok(CacheType::Memory),
            _ => Err(format!("Invalid cache type: {}", s)),
        }
    }
}

impl Default for CacheStrategyConfig {
    fn default() -> Self {
        Self::memory()
    }
}

impl CacheStrategyConfig {
    /// Keep verification codes in process memory
    pub fn memory() -> Self {
        Self {
            cache_type: CacheType::Memory,
            redis: None,
            memory: Some(MemoryCacheConfig::default()),
        }
    }

    /// Keep verification codes in Redis
    pub fn redis(config: CacheConfig) -> Self {
        Self {
            cache_type: CacheType::Redis,
            redis: Some(config),
            memory: None,
        }
    }

    /// Create from environment variables
    ///
    /// `VERIFICATION_STORE` selects the backend; `fallback` is used when it
    /// is unset or unrecognized.
    pub fn from_env(fallback: CacheType) -> Self {
        let cache_type = std::env::var("VERIFICATION_STORE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(fallback);

        match cache_type {
            CacheType::Memory => Self::memory(),
            CacheType::Redis => Self::redis(CacheConfig::from_env()),
        }
    }

    /// Check the selected backend has its settings
    pub fn validate(&self) -> Result<(), String> {
        match (self.cache_type, &self.redis) {
            (CacheType::Redis, None) => {
                Err("redis configuration is required when cache_type is redis".to_string())
            }
            (CacheType::Redis, Some(redis)) if redis.response_timeout_ms == 0 => {
                Err("redis response_timeout_ms must be greater than zero".to_string())
            }
            _ => Ok(()),
        }
    }
}

fn default_connection_timeout() -> u64 {
    5_000
}

fn default_response_timeout() -> u64 {
    500
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    50
}

fn default_cache_type() -> CacheType {
    CacheType::Memory
}
