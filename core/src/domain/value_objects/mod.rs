//! Value objects representing immutable domain concepts.

pub mod subject_key;

// Re-export commonly used types
pub use subject_key::SubjectKey;
