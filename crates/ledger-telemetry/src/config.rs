//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Node (party) name, empty for a process hosting several parties
    pub node_name: String,

    /// Log level filter (trace, debug, info, warn, error)
    pub log_level: String,

    /// Whether to enable console output (for development)
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "iou-ledger".to_string(),
            node_name: String::new(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `IOU_SERVICE_NAME`: Service name (default: iou-ledger)
    /// - `IOU_NODE_NAME`: Node name (default: empty)
    /// - `IOU_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `IOU_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `IOU_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("IOU_SERVICE_NAME")
                .unwrap_or_else(|_| "iou-ledger".to_string()),

            node_name: env::var("IOU_NODE_NAME").unwrap_or_default(),

            log_level: env::var("IOU_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("IOU_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("IOU_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),
        }
    }

    /// Create configuration for a single party's node.
    pub fn for_node(node_name: &str) -> Self {
        let mut config = Self::from_env();
        config.node_name = node_name.to_string();
        config
    }

    /// Service name including the node, if any.
    pub fn full_service_name(&self) -> String {
        if self.node_name.is_empty() {
            self.service_name.clone()
        } else {
            format!("{}-{}", self.service_name, self.node_name.to_lowercase())
        }
    }
}
