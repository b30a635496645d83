//! Domain-specific error types and error handling.

use thiserror::Error;

/// Errors raised by the verification cache and its entry stores
///
/// A wrong, expired or missing code is never an error; those collapse to a
/// `false` verification result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    /// The backing store could not be reached within its timeout
    #[error("Verification storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    /// Construction-time settings are unusable
    #[error("Invalid verification configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl VerificationError {
    /// Build a storage outage error
    pub fn storage_unavailable(reason: impl Into<String>) -> Self {
        VerificationError::StorageUnavailable { reason: reason.into() }
    }

    /// Build a configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        VerificationError::InvalidConfiguration { message: message.into() }
    }

    /// Whether the caller may retry the same operation later
    pub fn is_retryable(&self) -> bool {
        matches!(self, VerificationError::StorageUnavailable { .. })
    }
}

pub type VerificationResult<T> = Result<T, VerificationError>;
