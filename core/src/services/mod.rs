//! Business services containing domain logic and use cases.

pub mod verification;

// Re-export commonly used types
pub use verification::{
    Clock, CodeGenerator, EntryStore, ExpirySweeper, ManualClock, RandomCodeGenerator,
    SweepConfig, SweepResult, SystemClock, VerificationCache, VerificationCacheConfig,
};
