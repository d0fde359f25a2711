//! Domain layer for the issuance protocol

pub mod state_machine;

pub use state_machine::{IllegalTransition, IssuanceEvent, IssuanceState, IssuanceStateMachine};
