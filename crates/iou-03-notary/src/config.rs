//! Notary configuration from environment variables.

use std::env;

/// Configuration for a notary instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotaryConfig {
    /// Legal name published on the network map
    pub name: String,

    /// Re-run contract verification before committing
    pub validating: bool,
}

impl Default for NotaryConfig {
    fn default() -> Self {
        Self {
            name: "Notary".to_string(),
            validating: true,
        }
    }
}

impl NotaryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `IOU_NOTARY_NAME`: Legal name (default: Notary)
    /// - `IOU_NOTARY_VALIDATING`: Re-run contract verification (default: true)
    pub fn from_env() -> Self {
        Self {
            name: env::var("IOU_NOTARY_NAME").unwrap_or_else(|_| "Notary".to_string()),
            validating: env::var("IOU_NOTARY_VALIDATING")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
        }
    }

    /// Uniqueness-only notary that does not look at contract rules.
    pub fn non_validating(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            validating: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = NotaryConfig::default();
        assert_eq!(config.name, "Notary");
        assert!(config.validating);
    }

    #[test]
    fn test_non_validating() {
        let config = NotaryConfig::non_validating("Fast Notary");
        assert_eq!(config.name, "Fast Notary");
        assert!(!config.validating);
    }
}
