//! In-memory entry store
//!
//! Entries live in a sharded concurrent map keyed by the normalized subject.
//! Each operation locks only the shard holding its key, so operations on
//! unrelated subjects do not serialize.

use async_trait::async_trait;
use chrono::Duration;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::debug;

use sb_core::domain::{SubjectKey, VerificationEntry};
use sb_core::errors::VerificationResult;
use sb_core::services::verification::{Clock, EntryStore, SystemClock};
use sb_shared::config::MemoryCacheConfig;

/// Outcome of looking up a subject under the shard read lock
enum Lookup {
    Missing,
    Expired,
    Live(bool),
}

/// Process-local entry store
pub struct MemoryEntryStore {
    /// Pending codes keyed by normalized subject
    entries: DashMap<SubjectKey, VerificationEntry>,
    /// Time source for stamping and expiring entries
    clock: Arc<dyn Clock>,
}

impl MemoryEntryStore {
    /// Create an empty store using `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Create an empty store with an explicit shard count
    ///
    /// Shard counts that are not a power of two above one fall back to the
    /// map's default.
    pub fn with_config(config: &MemoryCacheConfig, clock: Arc<dyn Clock>) -> Self {
        let entries = if config.shard_amount > 1 && config.shard_amount.is_power_of_two() {
            DashMap::with_shard_amount(config.shard_amount)
        } else {
            DashMap::new()
        };

        Self { entries, clock }
    }

    /// Number of stored entries, including expired ones not yet reclaimed
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryEntryStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

#[async_trait]
impl EntryStore for MemoryEntryStore {
    async fn put(&self, subject: &SubjectKey, code: &str, ttl: Duration) -> VerificationResult<()> {
        let entry = VerificationEntry::new(code, self.clock.now(), ttl);
        self.entries.insert(subject.clone(), entry);
        Ok(())
    }

    async fn check(&self, subject: &SubjectKey, candidate: &str) -> VerificationResult<bool> {
        let now = self.clock.now();

        // The read guard must be released before evicting from the same shard.
        let lookup = match self.entries.get(subject) {
            None => Lookup::Missing,
            Some(entry) if entry.is_expired_at(now) => Lookup::Expired,
            Some(entry) => Lookup::Live(entry.matches(candidate)),
        };

        match lookup {
            Lookup::Missing => Ok(false),
            Lookup::Live(matched) => Ok(matched),
            Lookup::Expired => {
                // Re-checked under the write lock so a concurrent put survives
                if self
                    .entries
                    .remove_if(subject, |_, entry| entry.is_expired_at(now))
                    .is_some()
                {
                    debug!(subject = %subject.masked(), "Evicted expired verification code");
                }
                Ok(false)
            }
        }
    }

    async fn clear(&self, subject: &SubjectKey) -> VerificationResult<()> {
        self.entries.remove(subject);
        Ok(())
    }

    async fn remaining_ttl(&self, subject: &SubjectKey) -> VerificationResult<Option<Duration>> {
        let now = self.clock.now();
        Ok(self
            .entries
            .get(subject)
            .and_then(|entry| entry.remaining_at(now)))
    }

    async fn purge_expired(&self) -> VerificationResult<usize> {
        let now = self.clock.now();
        let mut removed = 0;

        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        Ok(removed)
    }
}
