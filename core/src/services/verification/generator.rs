//! Verification code generation

use rand::{rngs::OsRng, CryptoRng, Rng, RngCore};
use sb_shared::config::verification::{MAX_CODE_LENGTH, MIN_CODE_LENGTH};
use std::sync::{Mutex, PoisonError};

use crate::errors::{VerificationError, VerificationResult};

/// Produces fixed-length numeric verification codes
pub trait CodeGenerator: Send + Sync {
    /// Draw a new code
    fn generate(&self) -> String;

    /// Number of digits in every generated code
    fn code_length(&self) -> usize;
}

/// Code generator backed by an injected cryptographically secure RNG
///
/// Codes are drawn uniformly from `0..10^code_length` and zero-padded, so
/// `000000` is as likely as any other 6-digit value.
pub struct RandomCodeGenerator<R> {
    rng: Mutex<R>,
    code_length: usize,
    upper_bound: u64,
}

impl<R: RngCore + CryptoRng + Send> RandomCodeGenerator<R> {
    /// Create a generator drawing from `rng`
    ///
    /// # Arguments
    ///
    /// * `rng` - Cryptographically secure randomness source
    /// * `code_length` - Digits per code
    ///
    /// # Returns
    ///
    /// * `Err(VerificationError::InvalidConfiguration)` - If the length is out of range
    pub fn new(rng: R, code_length: usize) -> VerificationResult<Self> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&code_length) {
            return Err(VerificationError::invalid_configuration(format!(
                "code length must be between {} and {} digits, got {}",
                MIN_CODE_LENGTH, MAX_CODE_LENGTH, code_length
            )));
        }

        Ok(Self {
            rng: Mutex::new(rng),
            code_length,
            upper_bound: 10u64.pow(code_length as u32),
        })
    }
}

impl RandomCodeGenerator<OsRng> {
    /// Create a generator backed by the operating system CSPRNG
    pub fn secure(code_length: usize) -> VerificationResult<Self> {
        Self::new(OsRng, code_length)
    }
}

impl<R: RngCore + CryptoRng + Send> CodeGenerator for RandomCodeGenerator<R> {
    fn generate(&self) -> String {
        // gen_range rejects out-of-zone samples, so there is no modulo bias
        let value = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(0..self.upper_bound);

        format!("{:0width$}", value, width = self.code_length)
    }

    fn code_length(&self) -> usize {
        self.code_length
    }
}
