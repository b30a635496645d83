//! Cache module for verification code storage
//!
//! This module provides the entry store backends for the verification cache:
//! - an in-memory sharded map for single-process deployments and tests
//! - a Redis-backed store with per-operation timeouts for shared deployments

pub mod memory_store;
pub mod redis_client;
pub mod redis_store;

#[cfg(test)]
mod tests;

pub use memory_store::MemoryEntryStore;
pub use redis_client::RedisClient;
pub use redis_store::RedisEntryStore;

// Re-export commonly used types
pub use sb_shared::config::cache::CacheConfig;
