//! Driven Ports (SPI - Outbound Dependencies)
//!
//! Collaborators the issuance protocol needs from its host node.

use crate::messages::IssuanceMessage;
use async_trait::async_trait;
use iou_01_contract::{FinalizedTransaction, SignedTransaction, StateRef, TransactionSignature};
use shared_types::{Party, SecureHash, SessionError};
use std::time::Duration;
use thiserror::Error;

/// Why a notary did not finalize a transaction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotaryGatewayError {
    /// Inputs already consumed by another transaction
    #[error("Inputs already consumed: {conflicts:?}")]
    Conflict { conflicts: Vec<StateRef> },

    /// Any other refusal
    #[error("{reason}")]
    Rejected { reason: String },
}

/// Ordering/uniqueness service that finalizes transactions.
#[async_trait]
pub trait NotaryGateway: Send + Sync {
    async fn notarise(
        &self,
        stx: SignedTransaction,
    ) -> Result<FinalizedTransaction, NotaryGatewayError>;
}

/// Network map lookups.
pub trait IdentityService: Send + Sync {
    /// Known notaries, in preference order.
    fn notary_identities(&self) -> Vec<Party>;

    /// Resolve a legal name to its well-known identity.
    fn well_known_party(&self, name: &str) -> Option<Party>;
}

/// This node's identity and signing key.
pub trait KeyManagement: Send + Sync {
    fn our_identity(&self) -> Party;

    /// Sign a transaction id with our owning key.
    fn sign(&self, tx_id: &SecureHash) -> TransactionSignature;
}

/// One end of an issuance session with a single counterparty.
#[async_trait]
pub trait CounterpartySession: Send {
    /// Legal name of the party at the other end.
    fn counterparty(&self) -> &str;

    async fn send(&mut self, message: &IssuanceMessage) -> Result<(), SessionError>;

    /// Wait at most `timeout` for the next message.
    async fn receive(&mut self, timeout: Duration) -> Result<IssuanceMessage, SessionError>;
}

/// Opens sessions towards other parties.
#[async_trait]
pub trait FlowMessaging: Send + Sync {
    type Session: CounterpartySession;

    async fn initiate(&self, counterparty: &Party) -> Result<Self::Session, SessionError>;
}

/// This node's record of finalized transactions.
pub trait LedgerStore: Send + Sync {
    /// Store a finalized transaction. Returns false if it was already stored.
    fn record(&self, tx: FinalizedTransaction) -> bool;

    fn transaction(&self, id: &SecureHash) -> Option<FinalizedTransaction>;
}
