/// Runtime configuration for the relayer pipeline, read from environment
/// variables.
use std::env;

use crate::constants::DEFAULT_MAX_SUBMIT_ATTEMPTS;

#[derive(Debug, Clone)]
pub struct RelayerConfig {
    /// Whether the shared nonce allocator is consulted at all. The
    /// allocator handle must also be configured for allocation to happen.
    pub allocator_enabled: bool,
    /// Default number of send attempts per submission.
    pub max_attempts: u32,
    /// Suppresses allocator-degradation warnings in production.
    pub is_production: bool,
}

impl Default for RelayerConfig {
    fn default() -> Self {
        Self {
            allocator_enabled: true,
            max_attempts: DEFAULT_MAX_SUBMIT_ATTEMPTS,
            is_production: false,
        }
    }
}

impl RelayerConfig {
    /// Creates a `RelayerConfig` from environment variables.
    ///
    /// # Defaults
    ///
    /// - `NONCE_ALLOCATOR` defaults to enabled; `disabled` or `off`
    ///   (case-insensitive) turn it off.
    /// - `RELAYER_MAX_ATTEMPTS` defaults to `4`.
    /// - `APP_ENV` set to `production` marks a production build.
    pub fn from_env() -> Self {
        let allocator_enabled = env::var("NONCE_ALLOCATOR")
            .map(|v| {
                let v = v.to_lowercase();
                v != "disabled" && v != "off"
            })
            .unwrap_or(true);

        let max_attempts = env::var("RELAYER_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|&v| v > 0)
            .unwrap_or(DEFAULT_MAX_SUBMIT_ATTEMPTS);

        let is_production = env::var("APP_ENV")
            .map(|v| v.to_lowercase() == "production")
            .unwrap_or(false);

        Self {
            allocator_enabled,
            max_attempts,
            is_production,
        }
    }
}
