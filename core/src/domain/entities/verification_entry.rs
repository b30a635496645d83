//! Verification entry entity for email verification codes.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};

/// Length of the verification code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default expiration time for verification codes (10 minutes)
pub const DEFAULT_TTL_MINUTES: i64 = 10;

/// A pending verification code and the instant it stops being accepted
///
/// The entry is immutable once created; issuing a new code for the same
/// subject replaces the whole entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationEntry {
    /// The numeric verification code
    pub code: String,

    /// Timestamp when the code expires
    pub expires_at: DateTime<Utc>,
}

impl VerificationEntry {
    /// Creates an entry that expires `ttl` after `issued_at`
    ///
    /// # Arguments
    ///
    /// * `code` - The verification code
    /// * `issued_at` - Current time according to the store's clock
    /// * `ttl` - How long the code stays valid
    pub fn new(code: impl Into<String>, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        let expires_at = issued_at
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            code: code.into(),
            expires_at,
        }
    }

    /// Checks whether the entry has expired at `now`
    ///
    /// An entry is expired from its expiry instant onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Compares a candidate code against the stored one in constant time
    ///
    /// Comparison is exact; no trimming or case folding is applied.
    pub fn matches(&self, candidate: &str) -> bool {
        if self.code.len() != candidate.len() {
            return false;
        }
        constant_time_eq(self.code.as_bytes(), candidate.as_bytes())
    }

    /// Time left before expiry, `None` once expired
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.is_expired_at(now) {
            None
        } else {
            Some(self.expires_at - now)
        }
    }
}

// Keep codes out of debug logs.
impl std::fmt::Debug for VerificationEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationEntry")
            .field("code", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
