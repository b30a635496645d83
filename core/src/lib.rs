//! # SchoolBus Core
//!
//! Core business logic for email verification in the SchoolBus backend.
//! This crate contains the domain types, the verification cache service,
//! the entry store and clock seams, and the error types that the
//! infrastructure layer builds on.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
