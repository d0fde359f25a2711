//! # Node Runtime Library
//!
//! Hosts an IOU ledger network in one process. The main entry point is the
//! `main.rs` binary.
//!
//! ## Architectural Patterns
//!
//! - **Hexagonal Architecture**: the issuance crate defines ports, this crate
//!   wires adapters into them
//! - **Event-Driven**: every service publishes ledger events on one bus
//! - **Session Messaging**: parties talk only over router sessions

#![allow(clippy::type_complexity)]

pub mod adapters;
pub mod container;
pub mod handlers;
pub mod wiring;

pub use container::{ConfigError, NodeConfig, PartyNode};
pub use wiring::LedgerNetwork;
