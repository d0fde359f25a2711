//! # Ledger Telemetry
//!
//! Structured logging for IOU ledger nodes.
//!
//! Library crates only emit `tracing` events; a binary calls
//! [`init_telemetry`] once at startup to install the subscriber.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     let _guard = init_telemetry(TelemetryConfig::from_env())?;
//!     // Application code here
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `IOU_SERVICE_NAME` | `iou-ledger` | Service name in logs |
//! | `IOU_NODE_NAME` | (empty) | Party name of this node |
//! | `IOU_LOG_LEVEL` | `info` | Log level filter |
//! | `IOU_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `IOU_JSON_LOGS` | `false` | JSON lines instead of pretty output |

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::env_filter;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    tracing_setup::init_tracing(&config)?;
    Ok(TelemetryGuard {
        service: config.full_service_name(),
    })
}

/// Held for the lifetime of the application.
pub struct TelemetryGuard {
    service: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service, "Shutting down telemetry");
    }
}
