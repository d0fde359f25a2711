//! # Node Configuration
//!
//! Unified configuration for the hosted parties, the notary and logging.
//!
//! All timeouts have sane defaults with environment overrides; `validate`
//! rejects combinations the runtime cannot start with.

use iou_02_issuance::IssuanceConfig;
use iou_03_notary::NotaryConfig;
use ledger_telemetry::TelemetryConfig;
use std::collections::HashSet;
use std::env;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Legal names of the parties hosted by this process.
    pub parties: Vec<String>,
    /// Issuance protocol configuration, shared by every party.
    pub issuance: IssuanceConfig,
    /// Notary configuration.
    pub notary: NotaryConfig,
    /// Logging configuration.
    pub telemetry: TelemetryConfig,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            parties: vec!["Alice".to_string(), "Bob".to_string()],
            issuance: IssuanceConfig::default(),
            notary: NotaryConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Create configuration from environment variables.
    ///
    /// `IOU_PARTIES` is a comma-separated list of party names
    /// (default: `Alice,Bob`). The remaining sections read their own
    /// variables.
    pub fn from_env() -> Self {
        let parties = env::var("IOU_PARTIES")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(|_| Self::default().parties);

        Self {
            parties,
            issuance: IssuanceConfig::from_env(),
            notary: NotaryConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
        }
    }

    /// Validate that the runtime can start with this configuration.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - fewer than two parties are configured
    /// - a party name is repeated or equals the notary name
    /// - either protocol timeout is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parties.len() < 2 {
            return Err(ConfigError::TooFewParties {
                count: self.parties.len(),
            });
        }

        let mut seen = HashSet::new();
        for name in &self.parties {
            if *name == self.notary.name {
                return Err(ConfigError::PartyNamedAsNotary { name: name.clone() });
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateParty { name: name.clone() });
            }
        }

        if self.issuance.counterparty_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout {
                field: "counterparty_timeout_secs",
            });
        }
        if self.issuance.finality_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout {
                field: "finality_timeout_secs",
            });
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("At least two parties are required, {count} configured")]
    TooFewParties { count: usize },

    #[error("Party {name} is configured more than once")]
    DuplicateParty { name: String },

    #[error("Party {name} has the same name as the notary")]
    PartyNamedAsNotary { name: String },

    #[error("{field} must be greater than zero")]
    ZeroTimeout { field: &'static str },
}
