//! # iou-03-notary
//!
//! Uniqueness notary: the ordering collaborator that finalizes transactions.
//!
//! ## Overview
//!
//! - **Uniqueness**: every input state can be consumed by at most one
//!   transaction; a second consumer receives `NotaryError::Conflict`
//! - **Atomic commit**: inputs are checked and marked under one lock
//! - **Validating mode**: optionally re-runs contract verification before
//!   committing
//! - **Idempotent**: re-submitting a notarised transaction returns the same
//!   notary signature
//!
//! ```text
//! Coordinator ──SignedTransaction──→ Notary ──check──→ registry ──sign(id)──→ FinalizedTransaction
//!                                       │
//!                                       └── TransactionNotarised ──→ event bus
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use config::NotaryConfig;
pub use error::{NotaryError, NotaryResult};
pub use ports::inbound::NotaryApi;
pub use service::NotaryService;
