//! Error types for the IOU contract crate

use thiserror::Error;

/// A transaction broke one of the issuance rules.
///
/// Display strings are the human-readable rule descriptions shown to callers
/// and sent to counterparties as rejection reasons.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ContractViolation {
    /// Rule 1
    #[error("Required exactly one Issue command, found {count}.")]
    IssueCommandCount { count: usize },

    /// Rule 2
    #[error("No inputs should be consumed when issuing an IOU.")]
    InputsConsumed { count: usize },

    /// Rule 3
    #[error("Only one output state should be created when issuing an IOU.")]
    OutputCount { count: usize },

    /// Rule 4, output shape
    #[error("This must be an IOU transaction.")]
    NotAnIou { contract: String },

    /// Rule 4
    #[error("A newly issued IOU must have a positive amount.")]
    NonPositiveAmount { quantity: i64 },

    /// Rule 5
    #[error("The lender and borrower cannot have the same identity.")]
    SameLenderAndBorrower,

    /// Rule 6
    #[error("Both lender and borrower together only may sign IOU issue transaction.")]
    SignerMismatch,

    /// No verifier is known for a state's contract.
    #[error("No contract verifier registered for {contract}.")]
    UnknownContract { contract: String },
}

impl ContractViolation {
    /// Number of the issuance rule that failed, if this is a rule failure.
    #[must_use]
    pub fn rule(&self) -> Option<u8> {
        match self {
            Self::IssueCommandCount { .. } => Some(1),
            Self::InputsConsumed { .. } => Some(2),
            Self::OutputCount { .. } => Some(3),
            Self::NotAnIou { .. } | Self::NonPositiveAmount { .. } => Some(4),
            Self::SameLenderAndBorrower => Some(5),
            Self::SignerMismatch => Some(6),
            Self::UnknownContract { .. } => None,
        }
    }
}

/// Signature-level problems with a signed or finalized transaction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Invalid signature by key {key}")]
    InvalidSignature { key: String },

    #[error("Missing signatures from keys {keys:?}")]
    MissingSignatures { keys: Vec<String> },

    #[error("Notary signature by {actual}, expected {expected}")]
    WrongNotarySignature { expected: String, actual: String },
}

/// Result type for contract verification
pub type ContractResult<T> = Result<T, ContractViolation>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_numbers() {
        assert_eq!(ContractViolation::IssueCommandCount { count: 0 }.rule(), Some(1));
        assert_eq!(ContractViolation::SameLenderAndBorrower.rule(), Some(5));
        assert_eq!(
            ContractViolation::UnknownContract {
                contract: "cash".into()
            }
            .rule(),
            None
        );
    }
}
