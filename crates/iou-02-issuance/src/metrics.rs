//! # Issuance Metrics
//!
//! Prometheus counters for the issuance protocol.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! iou-02-issuance = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `iou_issuances_started_total` - Counter of issuance attempts
//! - `iou_issuances_finalized_total` - Counter of finalized issuances
//! - `iou_issuances_failed_total` - Counter of failed issuances (by kind)
//! - `iou_signatures_provided_total` - Counter of signatures given as responder
//! - `iou_responder_refusals_total` - Counter of responder refusals

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total issuance attempts
    pub static ref ISSUANCES_STARTED: IntCounter = register_int_counter!(
        "iou_issuances_started_total",
        "Total number of issuance attempts"
    )
    .expect("Failed to create ISSUANCES_STARTED metric");

    /// Total finalized issuances
    pub static ref ISSUANCES_FINALIZED: IntCounter = register_int_counter!(
        "iou_issuances_finalized_total",
        "Total number of finalized issuances"
    )
    .expect("Failed to create ISSUANCES_FINALIZED metric");

    /// Total failed issuances, labeled by failure kind
    pub static ref ISSUANCES_FAILED: IntCounterVec = register_int_counter_vec!(
        "iou_issuances_failed_total",
        "Total number of failed issuances",
        &["kind"]
    )
    .expect("Failed to create ISSUANCES_FAILED metric");

    /// Total signatures provided as responder
    pub static ref SIGNATURES_PROVIDED: IntCounter = register_int_counter!(
        "iou_signatures_provided_total",
        "Total number of signatures provided to initiators"
    )
    .expect("Failed to create SIGNATURES_PROVIDED metric");

    /// Total responder refusals
    pub static ref RESPONDER_REFUSALS: IntCounter = register_int_counter!(
        "iou_responder_refusals_total",
        "Total number of signature requests refused"
    )
    .expect("Failed to create RESPONDER_REFUSALS metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record an issuance attempt
#[cfg(feature = "metrics")]
pub fn record_issuance_started() {
    ISSUANCES_STARTED.inc();
}

/// Record a finalized issuance
#[cfg(feature = "metrics")]
pub fn record_issuance_finalized() {
    ISSUANCES_FINALIZED.inc();
}

/// Record a failed issuance
#[cfg(feature = "metrics")]
pub fn record_issuance_failed(kind: &str) {
    ISSUANCES_FAILED.with_label_values(&[kind]).inc();
}

/// Record a signature provided as responder
#[cfg(feature = "metrics")]
pub fn record_signature_provided() {
    SIGNATURES_PROVIDED.inc();
}

/// Record a responder refusal
#[cfg(feature = "metrics")]
pub fn record_responder_refusal() {
    RESPONDER_REFUSALS.inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature is disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_issuance_started() {}

#[cfg(not(feature = "metrics"))]
pub fn record_issuance_finalized() {}

#[cfg(not(feature = "metrics"))]
pub fn record_issuance_failed(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_signature_provided() {}

#[cfg(not(feature = "metrics"))]
pub fn record_responder_refusal() {}
