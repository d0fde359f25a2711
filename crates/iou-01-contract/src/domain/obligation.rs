//! Obligation record: the data behind one IOU.

use serde::{Deserialize, Serialize};
use shared_types::{Party, PublicKey};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

/// A quantity of some token, counted in minor units.
///
/// The quantity is signed so that zero and negative amounts can be expressed
/// and then rejected at issuance time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Amount {
    pub quantity: i64,
    pub token: String,
}

impl Amount {
    pub fn new(quantity: i64, token: impl Into<String>) -> Self {
        Self {
            quantity,
            token: token.into(),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.quantity, self.token)
    }
}

/// One IOU: `borrower` owes `lender` the `amount`.
///
/// Construction does not enforce `quantity > 0` or `lender != borrower`; those
/// are issuance-time rules checked by the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObligationRecord {
    pub amount: Amount,
    pub lender: Party,
    pub borrower: Party,
    /// Stable identifier for the obligation across its lifetime.
    pub linear_id: Uuid,
}

impl ObligationRecord {
    /// Create a record with a fresh `linear_id`.
    pub fn new(amount: Amount, lender: Party, borrower: Party) -> Self {
        Self {
            amount,
            lender,
            borrower,
            linear_id: Uuid::new_v4(),
        }
    }

    /// Lender then borrower.
    #[must_use]
    pub fn participants(&self) -> [&Party; 2] {
        [&self.lender, &self.borrower]
    }

    /// Distinct owning keys of the participants.
    #[must_use]
    pub fn participant_keys(&self) -> BTreeSet<PublicKey> {
        self.participants()
            .iter()
            .map(|party| party.owning_key)
            .collect()
    }
}
