//! Signed and finalized transactions.
//!
//! Signatures are append-only: a party adds its own signature and never
//! touches anyone else's. The transaction content itself is never modified
//! once signing starts.

use super::transaction::WireTransaction;
use crate::error::TransactionError;
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
use shared_crypto::verify_signature;
use shared_types::{key_fingerprint, PublicKey, SecureHash, Signature};
use std::collections::BTreeSet;

/// A signature over a transaction id, tagged with the signing key.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionSignature {
    pub by: PublicKey,
    #[serde_as(as = "Bytes")]
    pub bytes: Signature,
}

impl TransactionSignature {
    pub fn new(by: PublicKey, bytes: Signature) -> Self {
        Self { by, bytes }
    }

    /// Check this signature against `tx_id`.
    pub fn verify(&self, tx_id: &SecureHash) -> Result<(), TransactionError> {
        verify_signature(&self.by, tx_id.as_bytes(), &self.bytes).map_err(|_| {
            TransactionError::InvalidSignature {
                key: key_fingerprint(&self.by),
            }
        })
    }
}

/// A transaction plus the signatures collected so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub tx: WireTransaction,
    pub sigs: Vec<TransactionSignature>,
}

impl SignedTransaction {
    pub fn new(tx: WireTransaction, sig: TransactionSignature) -> Self {
        Self {
            tx,
            sigs: vec![sig],
        }
    }

    #[must_use]
    pub fn id(&self) -> SecureHash {
        self.tx.id()
    }

    /// Append a signature. A second signature by the same key is ignored.
    #[must_use]
    pub fn with_signature(mut self, sig: TransactionSignature) -> Self {
        if !self.sigs.iter().any(|existing| existing.by == sig.by) {
            self.sigs.push(sig);
        }
        self
    }

    #[must_use]
    pub fn required_signing_keys(&self) -> BTreeSet<PublicKey> {
        self.tx.required_signing_keys()
    }

    #[must_use]
    pub fn signing_keys(&self) -> BTreeSet<PublicKey> {
        self.sigs.iter().map(|sig| sig.by).collect()
    }

    /// Required keys that have not signed yet.
    #[must_use]
    pub fn missing_signatures(&self) -> BTreeSet<PublicKey> {
        let signed = self.signing_keys();
        self.required_signing_keys()
            .into_iter()
            .filter(|key| !signed.contains(key))
            .collect()
    }

    /// True when the signers are exactly the required keys.
    #[must_use]
    pub fn is_fully_signed(&self) -> bool {
        self.signing_keys() == self.required_signing_keys()
    }

    /// Verify every attached signature and require all required keys except
    /// `allowed_to_be_missing` to have signed.
    pub fn verify_signatures_except(
        &self,
        allowed_to_be_missing: &[PublicKey],
    ) -> Result<(), TransactionError> {
        let id = self.id();
        for sig in &self.sigs {
            sig.verify(&id)?;
        }

        let missing: Vec<String> = self
            .missing_signatures()
            .iter()
            .filter(|key| !allowed_to_be_missing.contains(*key))
            .map(key_fingerprint)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(TransactionError::MissingSignatures { keys: missing })
        }
    }

    pub fn verify_required_signatures(&self) -> Result<(), TransactionError> {
        self.verify_signatures_except(&[])
    }
}

/// A fully signed transaction accepted and signed by its notary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedTransaction {
    pub stx: SignedTransaction,
    pub notary_signature: TransactionSignature,
}

impl FinalizedTransaction {
    #[must_use]
    pub fn id(&self) -> SecureHash {
        self.stx.id()
    }

    #[must_use]
    pub fn tx(&self) -> &WireTransaction {
        &self.stx.tx
    }

    /// Verify party signatures and the notary's signature.
    pub fn verify(&self) -> Result<(), TransactionError> {
        self.stx.verify_required_signatures()?;

        let expected = self.stx.tx.notary.owning_key;
        if self.notary_signature.by != expected {
            return Err(TransactionError::WrongNotarySignature {
                expected: key_fingerprint(&expected),
                actual: key_fingerprint(&self.notary_signature.by),
            });
        }
        self.notary_signature.verify(&self.id())
    }
}
