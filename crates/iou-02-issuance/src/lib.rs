//! # iou-02-issuance
//!
//! Two-party issuance of an IOU onto the ledger.
//!
//! ## Overview
//!
//! - **Coordinator**: run by the lender. Builds the issuance, validates it
//!   locally, signs, collects the borrower's signature, notarises, records
//!   and shares the result
//! - **Responder**: run by the borrower. Checks the proposal before signing
//!   and records the finalized transaction it is sent back
//! - **State Machine**: every attempt moves forward through fixed states and
//!   ends in `Finalized` or `Failed(kind)`
//!
//! ## Protocol
//!
//! ```text
//! [BUILT] ──sign──→ [LOCALLY_SIGNED] ──request──→ [AWAITING_COUNTERPARTY]
//!                                                        │
//!                                                   counterparty signs
//!                                                        ↓
//! [FINALIZED] ←──notarised── [SUBMITTED] ←──submit── [FULLY_SIGNED]
//!
//! any non-terminal state ──failure──→ [FAILED(kind)]
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use iou_02_issuance::{IssuanceApi, IssuanceConfig, IssuanceCoordinator};
//!
//! let coordinator = IssuanceCoordinator::new(
//!     IssuanceConfig::default(),
//!     network_map,
//!     keys,
//!     messaging,
//!     notary,
//!     ledger,
//! );
//!
//! let finalized = coordinator.issue(record).await?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod adapters;
pub mod config;
pub mod coordinator;
pub mod domain;
pub mod error;
pub mod messages;
pub mod metrics;
pub mod ports;
pub mod responder;

#[cfg(test)]
mod test_support;

pub use adapters::{BusMessaging, BusSession, InMemoryLedger, InMemoryNetworkMap, LocalKeyManager};
pub use config::IssuanceConfig;
pub use coordinator::IssuanceCoordinator;
pub use domain::{IllegalTransition, IssuanceEvent, IssuanceState, IssuanceStateMachine};
pub use error::{FailureKind, IssuanceError, IssuanceResult, ResponderError, ResponderResult};
pub use messages::IssuanceMessage;
pub use ports::inbound::{IssuanceApi, ResponderApi};
pub use ports::outbound::{
    CounterpartySession, FlowMessaging, IdentityService, KeyManagement, LedgerStore,
    NotaryGateway, NotaryGatewayError,
};
pub use responder::IssuanceResponder;
