//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `cache` - Entry store backend selection and Redis configuration
//! - `environment` - Environment detection and logging configuration
//! - `verification` - Verification code length, lifetime and sweep schedule

pub mod cache;
pub mod environment;
pub mod verification;

use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use cache::{CacheConfig, CacheStrategyConfig, CacheType, MemoryCacheConfig};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use verification::VerificationConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Verification code configuration
    #[serde(default)]
    pub verification: VerificationConfig,

    /// Entry store configuration
    #[serde(default)]
    pub cache: CacheStrategyConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            verification: VerificationConfig::default(),
            cache: CacheStrategyConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    ///
    /// Development keeps codes in process memory so no Redis server is needed.
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            verification: VerificationConfig::default(),
            cache: CacheStrategyConfig::memory(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            verification: VerificationConfig::default(),
            cache: CacheStrategyConfig::redis(CacheConfig::default()),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from environment
    ///
    /// Starts from the environment preset and overlays the `VERIFICATION_*`,
    /// `VERIFICATION_STORE` and `REDIS_*` variables.
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        let mut config = match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::production();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        };

        config.verification = VerificationConfig::from_env();
        config.cache = CacheStrategyConfig::from_env(config.cache.cache_type);
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }
        config
    }

    /// Validate every sub-configuration
    pub fn validate(&self) -> Result<(), String> {
        self.verification.validate()?;
        self.cache.validate()
    }
}
