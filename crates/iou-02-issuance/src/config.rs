//! Issuance configuration from environment variables.

use std::env;
use std::time::Duration;

/// Configuration for coordinator and responder runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuanceConfig {
    /// Upper bound on any single wait for the counterparty
    pub counterparty_timeout_secs: u64,

    /// Upper bound on the notary round trip
    pub finality_timeout_secs: u64,

    /// Publish `IssuanceProgress` events on every state change
    pub publish_progress: bool,
}

impl Default for IssuanceConfig {
    fn default() -> Self {
        Self {
            counterparty_timeout_secs: 30,
            finality_timeout_secs: 30,
            publish_progress: true,
        }
    }
}

impl IssuanceConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `IOU_COUNTERPARTY_TIMEOUT_SECS`: Counterparty wait bound (default: 30)
    /// - `IOU_FINALITY_TIMEOUT_SECS`: Notary wait bound (default: 30)
    /// - `IOU_PUBLISH_PROGRESS`: Publish progress events (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            counterparty_timeout_secs: env::var("IOU_COUNTERPARTY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.counterparty_timeout_secs),

            finality_timeout_secs: env::var("IOU_FINALITY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.finality_timeout_secs),

            publish_progress: env::var("IOU_PUBLISH_PROGRESS")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.publish_progress),
        }
    }

    pub fn counterparty_timeout(&self) -> Duration {
        Duration::from_secs(self.counterparty_timeout_secs)
    }

    pub fn finality_timeout(&self) -> Duration {
        Duration::from_secs(self.finality_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IssuanceConfig::default();
        assert_eq!(config.counterparty_timeout(), Duration::from_secs(30));
        assert_eq!(config.finality_timeout(), Duration::from_secs(30));
        assert!(config.publish_progress);
    }
}
