//! Verification service module for email-based confirmation codes
//!
//! This module provides the verification code workflow used before account
//! creation and password resets:
//! - Cryptographically secure code generation
//! - Time-boxed storage of one pending code per email address
//! - Code verification and explicit invalidation
//! - Background sweeping of expired codes

mod clock;
mod config;
mod generator;
mod service;
mod sweeper;
mod traits;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::VerificationCacheConfig;
pub use generator::{CodeGenerator, RandomCodeGenerator};
pub use service::VerificationCache;
pub use sweeper::{ExpirySweeper, SweepConfig, SweepResult};
pub use traits::EntryStore;
