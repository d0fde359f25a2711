//! # Party Container
//!
//! Holds the services of each hosted party with their shared collaborators
//! injected.
//!
//! - One `PartyNode` per legal name
//! - The network map, session router, notary and event bus are shared
//! - Parties interact only through sessions and the notary

pub mod config;
pub mod party;

pub use config::{ConfigError, NodeConfig};
pub use party::{NodeCoordinator, NodeResponder, PartyNode};
