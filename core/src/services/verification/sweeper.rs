//! Expiry sweeper for periodic reclamation of expired verification codes
//!
//! Expired codes are already rejected on access; the sweeper only bounds
//! memory by physically removing entries nobody will look up again.

use sb_shared::config::VerificationConfig;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::traits::EntryStore;

/// Configuration for the expiry sweeper
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// How often to run a sweep (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic sweeping
    pub enabled: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 60,
            enabled: true,
        }
    }
}

impl From<&VerificationConfig> for SweepConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            interval_seconds: config.sweep_interval_seconds,
            enabled: config.sweep_enabled,
        }
    }
}

/// Service removing expired entries from an entry store
pub struct ExpirySweeper {
    store: Arc<dyn EntryStore>,
    config: SweepConfig,
}

impl ExpirySweeper {
    /// Create a new expiry sweeper
    pub fn new(store: Arc<dyn EntryStore>, config: SweepConfig) -> Self {
        Self { store, config }
    }

    /// Run a single sweep
    ///
    /// Store failures are recorded in the result rather than returned, so a
    /// transient outage does not stop the background loop.
    pub async fn run_sweep(&self) -> SweepResult {
        if !self.config.enabled {
            return SweepResult::default();
        }

        let mut result = SweepResult::default();

        match self.store.purge_expired().await {
            Ok(count) => {
                result.entries_removed = count;
                if count > 0 {
                    info!("Removed {} expired verification codes", count);
                } else {
                    debug!("No expired verification codes to remove");
                }
            }
            Err(e) => {
                error!("Failed to sweep expired verification codes: {}", e);
                result.errors.push(format!("Sweep error: {}", e));
            }
        }

        result
    }

    /// Start the sweeper as a background task
    ///
    /// Returns `None` when sweeping is disabled. Dropping the handle leaves
    /// the task running; abort it to stop sweeping.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Verification code sweeper is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds.max(1));

        Some(tokio::spawn(async move {
            info!(
                "Verification code sweeper started - will run every {} seconds",
                interval.as_secs()
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                let result = self.run_sweep().await;
                if !result.is_success() {
                    warn!("Sweep completed with errors: {:?}", result.errors);
                }
            }
        }))
    }
}

/// Result of a sweep
#[derive(Debug, Default)]
pub struct SweepResult {
    /// Number of expired entries removed
    pub entries_removed: usize,
    /// Any errors encountered during the sweep
    pub errors: Vec<String>,
}

impl SweepResult {
    /// Check if the sweep was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
