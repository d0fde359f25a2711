//! # Wiring Module
//!
//! Connects the hosted parties, the notary, the session router and the
//! event bus.
//!
//! ## Wiring Responsibilities
//!
//! 1. **Port Implementation**: give each coordinator the notary adapter,
//!    bus messaging and the shared network map
//! 2. **Session Routing**: register every party's inbox with the router
//! 3. **Event Routing**: attach every service to the ledger event bus

pub mod network;

pub use network::LedgerNetwork;
