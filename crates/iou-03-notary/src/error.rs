//! Error types for the notary subsystem

use iou_01_contract::{ContractViolation, StateRef, TransactionError};
use shared_types::SecureHash;
use thiserror::Error;

/// Reasons a notary refuses to finalize a transaction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotaryError {
    /// One or more inputs were already consumed by another transaction.
    #[error("Transaction {tx_id} conflicts on {} input(s) already consumed", conflicts.len())]
    Conflict {
        tx_id: SecureHash,
        conflicts: Vec<(StateRef, SecureHash)>,
    },

    /// The transaction names a different notary.
    #[error("Transaction names notary {actual}, this notary is {expected}")]
    WrongNotary { expected: String, actual: String },

    /// Party signatures are missing or invalid.
    #[error("Signature check failed: {0}")]
    InvalidSignatures(#[from] TransactionError),

    /// Validating mode only: the transaction breaks a contract rule.
    #[error("Contract verification failed: {0}")]
    TransactionInvalid(#[from] ContractViolation),
}

impl NotaryError {
    /// True for double-spend conflicts, as opposed to malformed submissions.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Result type for notary operations
pub type NotaryResult<T> = Result<T, NotaryError>;
