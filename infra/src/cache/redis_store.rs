//! Redis-backed entry store
//!
//! Each subject maps to a single key holding the JSON-encoded entry. The key
//! carries a native expiry matching the entry's lifetime, so Redis reclaims
//! abandoned codes without a sweeper. The stored expiry instant is still
//! checked on read against the injected clock.

use async_trait::async_trait;
use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, warn};

use sb_core::domain::{SubjectKey, VerificationEntry};
use sb_core::errors::{VerificationError, VerificationResult};
use sb_core::services::verification::{Clock, EntryStore, SystemClock};
use sb_shared::config::CacheConfig;

use super::redis_client::RedisClient;

/// Key namespace for pending verification codes
const KEY_NAMESPACE: &str = "verification:code";

/// Entry store backed by a shared Redis instance
pub struct RedisEntryStore {
    client: RedisClient,
    clock: Arc<dyn Clock>,
}

impl RedisEntryStore {
    /// Create a store on top of an established client
    pub fn new(client: RedisClient) -> Self {
        Self::with_clock(client, Arc::new(SystemClock))
    }

    /// Create a store that stamps entries using `clock`
    pub fn with_clock(client: RedisClient, clock: Arc<dyn Clock>) -> Self {
        Self { client, clock }
    }

    /// Check that the backing Redis instance answers
    pub async fn health_check(&self) -> VerificationResult<bool> {
        Ok(self.client.health_check().await?)
    }

    fn key_for(&self, subject: &SubjectKey) -> String {
        redis_key(self.client.config(), subject)
    }

    async fn load(&self, key: &str) -> VerificationResult<Option<VerificationEntry>> {
        match self.client.get(key).await? {
            Some(raw) => decode_entry(&raw).map(Some),
            None => Ok(None),
        }
    }
}

/// Full Redis key for `subject`, including the configured prefix
pub(crate) fn redis_key(config: &CacheConfig, subject: &SubjectKey) -> String {
    config.make_key(&format!("{}:{}", KEY_NAMESPACE, subject))
}

pub(crate) fn encode_entry(entry: &VerificationEntry) -> VerificationResult<String> {
    serde_json::to_string(entry)
        .map_err(|e| VerificationError::storage_unavailable(format!("encode entry: {}", e)))
}

pub(crate) fn decode_entry(raw: &str) -> VerificationResult<VerificationEntry> {
    serde_json::from_str(raw)
        .map_err(|e| VerificationError::storage_unavailable(format!("corrupt entry: {}", e)))
}

/// Native key lifetime in milliseconds, never below one
pub(crate) fn expiry_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.num_milliseconds()).unwrap_or(0).max(1)
}

#[async_trait]
impl EntryStore for RedisEntryStore {
    async fn put(&self, subject: &SubjectKey, code: &str, ttl: Duration) -> VerificationResult<()> {
        let entry = VerificationEntry::new(code, self.clock.now(), ttl);
        let value = encode_entry(&entry)?;

        self.client
            .set_with_expiry_ms(&self.key_for(subject), &value, expiry_millis(ttl))
            .await?;
        Ok(())
    }

    async fn check(&self, subject: &SubjectKey, candidate: &str) -> VerificationResult<bool> {
        let key = self.key_for(subject);
        let Some(entry) = self.load(&key).await? else {
            return Ok(false);
        };

        if entry.is_expired_at(self.clock.now()) {
            debug!(subject = %subject.masked(), "Stored verification code already expired");
            return Ok(false);
        }

        Ok(entry.matches(candidate))
    }

    async fn clear(&self, subject: &SubjectKey) -> VerificationResult<()> {
        if !self.client.delete(&self.key_for(subject)).await? {
            debug!(subject = %subject.masked(), "No verification code to clear");
        }
        Ok(())
    }

    async fn remaining_ttl(&self, subject: &SubjectKey) -> VerificationResult<Option<Duration>> {
        let key = self.key_for(subject);
        let entry = match self.load(&key).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(subject = %subject.masked(), "Failed to read verification code: {}", e);
                return Err(e);
            }
        };

        Ok(entry.and_then(|entry| entry.remaining_at(self.clock.now())))
    }

    async fn purge_expired(&self) -> VerificationResult<usize> {
        Ok(0)
    }
}
