//! Entry store trait implemented by the storage backends

use async_trait::async_trait;
use chrono::Duration;

use crate::domain::SubjectKey;
use crate::errors::VerificationResult;

/// Storage for pending verification codes, one per subject
///
/// Every operation is atomic per subject key. Implementations must never
/// report an expired entry as a match, and must surface backend outages as
/// `VerificationError::StorageUnavailable` rather than as a missing entry.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Install `code` as the only entry for `subject`, expiring after `ttl`
    async fn put(&self, subject: &SubjectKey, code: &str, ttl: Duration) -> VerificationResult<()>;

    /// Whether `candidate` matches the live entry for `subject`
    ///
    /// A mismatch leaves the entry untouched. Expired entries may be evicted.
    async fn check(&self, subject: &SubjectKey, candidate: &str) -> VerificationResult<bool>;

    /// Remove any entry for `subject`
    async fn clear(&self, subject: &SubjectKey) -> VerificationResult<()>;

    /// Time left on the live entry for `subject`
    async fn remaining_ttl(&self, subject: &SubjectKey) -> VerificationResult<Option<Duration>>;

    /// Physically remove expired entries, returning how many were removed
    ///
    /// Backends that expire keys natively return `Ok(0)`.
    async fn purge_expired(&self) -> VerificationResult<usize>;
}
