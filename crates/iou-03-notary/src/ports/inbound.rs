//! Driving Ports (API - Inbound)

use crate::error::NotaryResult;
use async_trait::async_trait;
use iou_01_contract::{FinalizedTransaction, SignedTransaction, StateRef};
use shared_types::{Party, SecureHash};

/// Primary notary API.
#[async_trait]
pub trait NotaryApi: Send + Sync {
    /// Check, sequence and sign a fully signed transaction.
    ///
    /// Submitting a transaction that was already notarised returns the same
    /// finalized transaction again.
    async fn notarise(&self, stx: SignedTransaction) -> NotaryResult<FinalizedTransaction>;

    /// This notary's identity.
    fn identity(&self) -> &Party;

    /// Transaction that consumed `state`, if any.
    async fn consumer_of(&self, state: StateRef) -> Option<SecureHash>;
}
