//! Configuration for the verification cache

use chrono::Duration;
use sb_shared::config::VerificationConfig;

use crate::domain::entities::verification_entry::DEFAULT_TTL_MINUTES;

/// Largest TTL that converts to a chrono duration without overflow
const MAX_TTL_SECONDS: u64 = (i64::MAX / 1_000) as u64;

/// Configuration for the verification cache
#[derive(Debug, Clone)]
pub struct VerificationCacheConfig {
    /// How long an issued code stays valid
    pub code_ttl: Duration,
}

impl Default for VerificationCacheConfig {
    fn default() -> Self {
        Self {
            code_ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
        }
    }
}

impl From<&VerificationConfig> for VerificationCacheConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            code_ttl: Duration::seconds(config.code_ttl_seconds.min(MAX_TTL_SECONDS) as i64),
        }
    }
}
