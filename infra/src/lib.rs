//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the SchoolBus
//! verification services. It provides concrete entry store backends,
//! logging setup and the wiring that assembles the verification cache.
//!
//! ## Architecture
//!
//! The infrastructure layer contains:
//! - **Cache**: in-memory and Redis-backed entry stores
//! - **Logging**: tracing subscriber initialization
//! - **Wiring**: configuration loading and service construction

use std::sync::Arc;

use sb_core::errors::VerificationError;
use sb_core::services::verification::{
    EntryStore, ExpirySweeper, RandomCodeGenerator, SweepConfig, SystemClock, VerificationCache,
    VerificationCacheConfig,
};
use sb_shared::config::{AppConfig, CacheType, MemoryCacheConfig};
use tokio::task::JoinHandle;

/// Cache module - Entry store backends and Redis client
pub mod cache;

/// Logging module - tracing subscriber setup
pub mod logging;

use cache::{MemoryEntryStore, RedisClient, RedisEntryStore};

/// Verification services assembled from configuration
pub struct VerificationServices {
    /// Verification cache used by the account flows
    pub cache: Arc<VerificationCache>,
    /// Entry store shared by the cache and the sweeper
    pub store: Arc<dyn EntryStore>,
    /// Background sweeper task, when enabled
    pub sweeper: Option<JoinHandle<()>>,
}

impl VerificationServices {
    /// Stop the background sweeper if it is running
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.sweeper.take() {
            handle.abort();
            tracing::info!("Verification code sweeper stopped");
        }
    }
}

/// Build the verification services described by `config`
///
/// This function sets up:
/// - The entry store selected by the cache strategy
/// - An OS-backed code generator
/// - The verification cache
/// - The background sweeper (when enabled)
pub async fn build_verification_services(
    config: &AppConfig,
) -> Result<VerificationServices, InfrastructureError> {
    config.validate().map_err(InfrastructureError::Config)?;

    tracing::info!(
        environment = %config.environment,
        store = ?config.cache.cache_type,
        "Initializing verification services..."
    );

    let store: Arc<dyn EntryStore> = match config.cache.cache_type {
        CacheType::Memory => {
            let memory = config.cache.memory.clone().unwrap_or_default();
            Arc::new(MemoryEntryStore::with_config(&memory, Arc::new(SystemClock)))
        }
        CacheType::Redis => {
            let redis = config.cache.redis.clone().ok_or_else(|| {
                InfrastructureError::Config("redis configuration missing".to_string())
            })?;
            let client = RedisClient::new(redis).await?;
            Arc::new(RedisEntryStore::new(client))
        }
    };

    let generator = Arc::new(RandomCodeGenerator::secure(config.verification.code_length)?);
    let cache = Arc::new(VerificationCache::new(
        store.clone(),
        generator,
        VerificationCacheConfig::from(&config.verification),
    )?);

    let sweeper = match config.cache.cache_type {
        CacheType::Memory => Arc::new(ExpirySweeper::new(
            store.clone(),
            SweepConfig::from(&config.verification),
        ))
        .start_background_task(),
        // Redis expires keys on its own
        CacheType::Redis => None,
    };

    tracing::info!("Verification services initialized successfully");

    Ok(VerificationServices {
        cache,
        store,
        sweeper,
    })
}

/// Build an in-memory verification stack with the default settings
///
/// Intended for development and tests; no sweeper is started.
pub fn in_memory_verification_cache(
) -> Result<(Arc<VerificationCache>, Arc<MemoryEntryStore>), InfrastructureError> {
    let store = Arc::new(MemoryEntryStore::with_config(
        &MemoryCacheConfig::default(),
        Arc::new(SystemClock),
    ));
    let generator = Arc::new(RandomCodeGenerator::secure(
        sb_core::domain::DEFAULT_CODE_LENGTH,
    )?);
    let cache = VerificationCache::new(store.clone(), generator, VerificationCacheConfig::default())?;
    Ok((Arc::new(cache), store))
}

/// Load application configuration from environment
///
/// Reads `.env` and the environment-specific `.env.<environment>` file if
/// present, then the process environment.
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    dotenvy::dotenv().ok(); // Load .env file if present
    let environment = sb_shared::config::Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();

    let config = AppConfig::from_env();
    config.validate().map_err(InfrastructureError::Config)?;
    Ok(config)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Cache operation exceeded its time budget
    #[error("Cache operation '{operation}' timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    /// Stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logging setup error
    #[error("Logging error: {0}")]
    Logging(String),

    /// Verification service construction error
    #[error(transparent)]
    Verification(#[from] VerificationError),
}

impl From<InfrastructureError> for VerificationError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Verification(inner) => inner,
            other => VerificationError::storage_unavailable(other.to_string()),
        }
    }
}
