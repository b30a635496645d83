//! Shared utilities and common types for the SchoolBus server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types (verification, cache, environment, logging)
//! - Log-masking helpers for personal identifiers

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, CacheStrategyConfig, CacheType, Environment, LogFormat,
    LoggingConfig, MemoryCacheConfig, VerificationConfig,
};
pub use utils::email;
