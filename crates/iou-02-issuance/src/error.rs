//! Error types for the issuance protocol

use crate::domain::IllegalTransition;
use iou_01_contract::{ContractViolation, StateRef};
use serde::{Deserialize, Serialize};
use shared_types::{SecureHash, SessionError};
use std::fmt;
use thiserror::Error;

/// Coarse failure classification, used in `IssuanceState::Failed`, logs and
/// metrics labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// The transaction broke a contract rule
    Validation,
    /// The counterparty refused to sign
    CounterpartyRejection,
    /// The notary found an input already consumed
    NotarizationConflict,
    /// The notary refused or did not answer for another reason
    NotaryRejection,
    /// Messaging failed (timeout, unreachable, closed)
    Session,
    /// The counterparty broke the protocol
    Protocol,
    /// The attempt could not start (no notary, wrong initiator)
    Setup,
}

impl FailureKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::CounterpartyRejection => "counterparty_rejection",
            Self::NotarizationConflict => "notarization_conflict",
            Self::NotaryRejection => "notary_rejection",
            Self::Session => "session",
            Self::Protocol => "protocol",
            Self::Setup => "setup",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced to the caller of `issue`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IssuanceError {
    /// Local pre-flight validation failed; nothing was sent
    #[error("Transaction failed validation: {0}")]
    Validation(#[from] ContractViolation),

    /// The counterparty declined to sign
    #[error("{party} refused to sign: {reason}")]
    CounterpartyRejection { party: String, reason: String },

    /// The notary found inputs consumed by another transaction
    #[error("Notarisation conflict for {tx_id} on {} input(s)", conflicts.len())]
    NotarizationConflict {
        tx_id: SecureHash,
        conflicts: Vec<StateRef>,
    },

    /// The notary refused the transaction for a reason other than a conflict
    #[error("Notary rejected transaction: {reason}")]
    NotaryRejected { reason: String },

    /// The notary did not answer in time
    #[error("Notary did not respond within {secs}s")]
    NotaryTimeout { secs: u64 },

    /// Messaging failure
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// The counterparty returned a signature that is not theirs or does not verify
    #[error("Invalid signature from {party}: {reason}")]
    InvalidCounterpartySignature { party: String, reason: String },

    /// Internal protocol ordering violation
    #[error(transparent)]
    IllegalTransition(#[from] IllegalTransition),

    /// The identity service knows no notary
    #[error("No notary available on the network map")]
    NoNotaryAvailable,

    /// Only the lender may initiate an issuance
    #[error("Issuance must be initiated by the lender {lender}, not {initiator}")]
    NotLender { lender: String, initiator: String },

    /// The borrower is not a well-known party with the given key
    #[error("Unknown counterparty: {name}")]
    UnknownCounterparty { name: String },
}

impl IssuanceError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation(_) => FailureKind::Validation,
            Self::CounterpartyRejection { .. } => FailureKind::CounterpartyRejection,
            Self::NotarizationConflict { .. } => FailureKind::NotarizationConflict,
            Self::NotaryRejected { .. } | Self::NotaryTimeout { .. } => {
                FailureKind::NotaryRejection
            }
            Self::Session(_) => FailureKind::Session,
            Self::InvalidCounterpartySignature { .. } | Self::IllegalTransition(_) => {
                FailureKind::Protocol
            }
            Self::NoNotaryAvailable | Self::NotLender { .. } | Self::UnknownCounterparty { .. } => {
                FailureKind::Setup
            }
        }
    }
}

/// Errors ending a responder run.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResponderError {
    /// Messaging failure
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// This party refused to sign; the reason was sent to the initiator
    #[error("Refused to sign: {reason}")]
    Refused { reason: String },

    /// The initiator abandoned the issuance after we signed
    #[error("Initiator abandoned issuance: {reason}")]
    Abandoned { reason: String },

    /// The finalized transaction returned to us does not check out
    #[error("Invalid finalized transaction: {reason}")]
    InvalidFinalTransaction { reason: String },
}

/// Result type for issuance operations
pub type IssuanceResult<T> = Result<T, IssuanceError>;

/// Result type for responder operations
pub type ResponderResult<T> = Result<T, ResponderError>;
