//! Main verification cache implementation

use chrono::Duration;
use std::sync::Arc;

use crate::domain::SubjectKey;
use crate::errors::{VerificationError, VerificationResult};

use super::config::VerificationCacheConfig;
use super::generator::CodeGenerator;
use super::traits::EntryStore;

/// Verification cache for email confirmation codes
///
/// Issues a code per email address, checks submitted codes against it and
/// invalidates it once the caller has acted on a successful check. A
/// successful `verify` does not consume the code; callers must call
/// `invalidate` right after it to close the replay window.
pub struct VerificationCache {
    /// Store holding pending codes
    store: Arc<dyn EntryStore>,
    /// Source of new codes
    generator: Arc<dyn CodeGenerator>,
    /// Cache configuration
    config: VerificationCacheConfig,
}

impl VerificationCache {
    /// Create a new verification cache
    ///
    /// # Arguments
    ///
    /// * `store` - Entry store implementation
    /// * `generator` - Code generator implementation
    /// * `config` - Cache configuration
    ///
    /// # Returns
    ///
    /// * `Err(VerificationError::InvalidConfiguration)` - If the TTL is not positive
    pub fn new(
        store: Arc<dyn EntryStore>,
        generator: Arc<dyn CodeGenerator>,
        config: VerificationCacheConfig,
    ) -> VerificationResult<Self> {
        if config.code_ttl <= Duration::zero() {
            return Err(VerificationError::invalid_configuration(
                "code TTL must be greater than zero",
            ));
        }

        Ok(Self {
            store,
            generator,
            config,
        })
    }

    /// Issue a new code for `subject`, replacing any pending one
    ///
    /// The caller is responsible for delivering the returned code.
    ///
    /// # Arguments
    ///
    /// * `subject` - Email address the code is issued to
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The issued code
    /// * `Err(VerificationError::StorageUnavailable)` - If the store is unreachable
    pub async fn issue(&self, subject: &str) -> VerificationResult<String> {
        let key = SubjectKey::new(subject);
        let code = self.generator.generate();

        self.store
            .put(&key, &code, self.config.code_ttl)
            .await
            .map_err(|e| {
                tracing::error!(
                    subject = %key.masked(),
                    error = %e,
                    "Failed to store verification code"
                );
                e
            })?;

        tracing::info!(
            subject = %key.masked(),
            ttl_seconds = self.config.code_ttl.num_seconds(),
            event = "verification_code_issued",
            "Verification code issued"
        );

        Ok(code)
    }

    /// Check a submitted code for `subject`
    ///
    /// Missing, expired and wrong codes all return `Ok(false)`. A wrong code
    /// does not invalidate the pending one.
    ///
    /// # Arguments
    ///
    /// * `subject` - Email address the code was issued to
    /// * `code` - Code submitted by the user
    pub async fn verify(&self, subject: &str, code: &str) -> VerificationResult<bool> {
        let key = SubjectKey::new(subject);
        let verified = self.store.check(&key, code).await.map_err(|e| {
            tracing::error!(
                subject = %key.masked(),
                error = %e,
                "Verification check failed"
            );
            e
        })?;

        if verified {
            tracing::info!(
                subject = %key.masked(),
                event = "verification_code_accepted",
                "Verification code accepted"
            );
        } else {
            tracing::warn!(
                subject = %key.masked(),
                event = "verification_code_rejected",
                "Verification code rejected"
            );
        }

        Ok(verified)
    }

    /// Invalidate the pending code for `subject`
    ///
    /// Succeeds whether or not a code is pending.
    pub async fn invalidate(&self, subject: &str) -> VerificationResult<()> {
        let key = SubjectKey::new(subject);
        self.store.clear(&key).await?;

        tracing::info!(
            subject = %key.masked(),
            event = "verification_code_invalidated",
            "Verification code invalidated"
        );

        Ok(())
    }

    /// Whether an unexpired code is pending for `subject`
    pub async fn has_pending(&self, subject: &str) -> VerificationResult<bool> {
        Ok(self.remaining_ttl(subject).await?.is_some())
    }

    /// Time left before the pending code for `subject` expires
    pub async fn remaining_ttl(&self, subject: &str) -> VerificationResult<Option<Duration>> {
        self.store.remaining_ttl(&SubjectKey::new(subject)).await
    }

    /// Lifetime given to newly issued codes
    pub fn ttl(&self) -> Duration {
        self.config.code_ttl
    }

    /// Number of digits in issued codes
    pub fn code_length(&self) -> usize {
        self.generator.code_length()
    }
}
