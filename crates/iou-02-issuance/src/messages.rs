//! Messages exchanged between the coordinator and the responder.
//!
//! ```text
//! Coordinator                              Responder
//!     │ ── SignatureRequest(stx) ───────────→ │
//!     │ ←─────────── SignatureResponse(sig) ─ │   or Rejected { reason }
//!     │ ── Finalized(ftx) ──────────────────→ │   or Aborted { reason }
//! ```

use iou_01_contract::{FinalizedTransaction, SignedTransaction, TransactionSignature};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssuanceMessage {
    /// Partially signed transaction the counterparty is asked to sign
    SignatureRequest(SignedTransaction),
    /// The counterparty's signature over the requested transaction id
    SignatureResponse(TransactionSignature),
    /// The counterparty refused to sign
    Rejected { reason: String },
    /// The notarised transaction, for the counterparty to record
    Finalized(FinalizedTransaction),
    /// The initiator gave up after collecting signatures
    Aborted { reason: String },
}

impl IssuanceMessage {
    /// Short name for logs and protocol errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::SignatureRequest(_) => "SignatureRequest",
            Self::SignatureResponse(_) => "SignatureResponse",
            Self::Rejected { .. } => "Rejected",
            Self::Finalized(_) => "Finalized",
            Self::Aborted { .. } => "Aborted",
        }
    }
}
