//! Verification code configuration module

use serde::{Deserialize, Serialize};

/// Default number of digits in a verification code
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Default verification code lifetime (10 minutes)
pub const DEFAULT_CODE_TTL_SECONDS: u64 = 600;

/// Default interval between expiry sweeps
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 60;

/// Shortest accepted code length
pub const MIN_CODE_LENGTH: usize = 4;

/// Longest accepted code length
pub const MAX_CODE_LENGTH: usize = 12;

/// Email verification code configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Number of decimal digits in each issued code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Seconds an issued code remains valid
    #[serde(default = "default_code_ttl")]
    pub code_ttl_seconds: u64,

    /// Run the background sweep that reclaims expired codes
    #[serde(default = "default_sweep_enabled")]
    pub sweep_enabled: bool,

    /// Seconds between background sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            code_ttl_seconds: DEFAULT_CODE_TTL_SECONDS,
            sweep_enabled: default_sweep_enabled(),
            sweep_interval_seconds: DEFAULT_SWEEP_INTERVAL_SECONDS,
        }
    }
}

impl VerificationConfig {
    /// Create from environment variables
    ///
    /// Unset or unparsable variables fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            code_length: env_or("VERIFICATION_CODE_LENGTH", DEFAULT_CODE_LENGTH),
            code_ttl_seconds: env_or("VERIFICATION_CODE_TTL_SECONDS", DEFAULT_CODE_TTL_SECONDS),
            sweep_enabled: env_or("VERIFICATION_SWEEP_ENABLED", default_sweep_enabled()),
            sweep_interval_seconds: env_or(
                "VERIFICATION_SWEEP_INTERVAL_SECONDS",
                DEFAULT_SWEEP_INTERVAL_SECONDS,
            ),
        }
    }

    /// Set the code length
    pub fn with_code_length(mut self, code_length: usize) -> Self {
        self.code_length = code_length;
        self
    }

    /// Set the code lifetime in seconds
    pub fn with_ttl_seconds(mut self, ttl_seconds: u64) -> Self {
        self.code_ttl_seconds = ttl_seconds;
        self
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&self.code_length) {
            return Err(format!(
                "code_length must be between {} and {}, got {}",
                MIN_CODE_LENGTH, MAX_CODE_LENGTH, self.code_length
            ));
        }
        if self.code_ttl_seconds == 0 {
            return Err("code_ttl_seconds must be greater than zero".to_string());
        }
        if self.sweep_enabled && self.sweep_interval_seconds == 0 {
            return Err("sweep_interval_seconds must be greater than zero".to_string());
        }
        Ok(())
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}

fn default_code_length() -> usize {
    DEFAULT_CODE_LENGTH
}

fn default_code_ttl() -> u64 {
    DEFAULT_CODE_TTL_SECONDS
}

fn default_sweep_enabled() -> bool {
    true
}

fn default_sweep_interval() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_config_default() {
        let config = VerificationConfig::default();
        assert_eq!(config.code_length, 6);
        assert_eq!(config.code_ttl_seconds, 600);
        assert!(config.sweep_enabled);
        assert_eq!(config.sweep_interval_seconds, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_code_length_bounds() {
        assert!(VerificationConfig::default().with_code_length(3).validate().is_err());
        assert!(VerificationConfig::default().with_code_length(4).validate().is_ok());
        assert!(VerificationConfig::default().with_code_length(12).validate().is_ok());
        assert!(VerificationConfig::default().with_code_length(13).validate().is_err());
    }

    #[test]
    fn test_validate_zero_ttl() {
        let config = VerificationConfig::default().with_ttl_seconds(0);
        assert!(config.validate().unwrap_err().contains("code_ttl_seconds"));
    }

    #[test]
    fn test_zero_sweep_interval_only_matters_when_enabled() {
        let mut config = VerificationConfig::default();
        config.sweep_interval_seconds = 0;
        assert!(config.validate().is_err());

        config.sweep_enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_deserialize() {
        let config: VerificationConfig =
            serde_json::from_str(r#"{ "code_length": 8 }"#).unwrap();
        assert_eq!(config.code_length, 8);
        assert_eq!(config.code_ttl_seconds, DEFAULT_CODE_TTL_SECONDS);
    }
}
