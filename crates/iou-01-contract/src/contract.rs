//! # IOU Contract
//!
//! The transition validator for IOU issuance. Pure and deterministic: the
//! same transaction always produces the same verdict, and no rule touches
//! anything outside the transaction.
//!
//! ## Rules (first failure wins)
//!
//! | # | Rule |
//! |---|------|
//! | 1 | Exactly one `Issue` command |
//! | 2 | No inputs consumed |
//! | 3 | Exactly one output |
//! | 4 | The output is an IOU with a positive amount |
//! | 5 | Lender and borrower differ |
//! | 6 | `Issue` signers are exactly {lender key, borrower key} |

use crate::domain::{CommandKind, ContractState, ObligationRecord, WireTransaction};
use crate::error::{ContractResult, ContractViolation};

/// Contract identifier attached to IOU states.
pub const IOU_CONTRACT_ID: &str = "iou-ledger.contract.IouContract";

/// Verifier for transactions touching IOU states.
#[derive(Debug, Clone, Copy, Default)]
pub struct IouContract;

impl IouContract {
    /// Run every issuance rule in order.
    pub fn verify(tx: &WireTransaction) -> ContractResult<()> {
        // 1
        let issue_count = tx.commands_of_kind(&CommandKind::Issue).count();
        if issue_count != 1 {
            return Err(ContractViolation::IssueCommandCount { count: issue_count });
        }
        let issue = tx
            .commands_of_kind(&CommandKind::Issue)
            .next()
            .ok_or(ContractViolation::IssueCommandCount { count: 0 })?;

        // 2
        if !tx.inputs.is_empty() {
            return Err(ContractViolation::InputsConsumed {
                count: tx.inputs.len(),
            });
        }

        // 3 and 4 (shape)
        let record = Self::single_obligation_output(tx)?;

        // 4
        if record.amount.quantity <= 0 {
            return Err(ContractViolation::NonPositiveAmount {
                quantity: record.amount.quantity,
            });
        }

        // 5
        if record.lender == record.borrower {
            return Err(ContractViolation::SameLenderAndBorrower);
        }

        // 6
        if issue.signers != record.participant_keys() {
            return Err(ContractViolation::SignerMismatch);
        }

        Ok(())
    }

    /// Exactly one output, and that output is an IOU.
    ///
    /// This is the only check a signing counterparty insists on before
    /// contributing its signature.
    pub fn single_obligation_output(tx: &WireTransaction) -> ContractResult<&ObligationRecord> {
        let [output] = tx.outputs.as_slice() else {
            return Err(ContractViolation::OutputCount {
                count: tx.outputs.len(),
            });
        };
        match output {
            ContractState::Obligation(record) => Ok(record),
            ContractState::Opaque { contract, .. } => Err(ContractViolation::NotAnIou {
                contract: contract.clone(),
            }),
        }
    }
}

/// Verify a transaction against every contract it involves.
///
/// Transactions carrying an IOU output or an `Issue` command are checked by
/// [`IouContract`]. Any other contract is unknown to this ledger.
pub fn verify_transaction(tx: &WireTransaction) -> ContractResult<()> {
    let touches_iou = tx
        .commands
        .iter()
        .any(|command| command.kind == CommandKind::Issue)
        || tx.obligation_outputs().next().is_some();

    if touches_iou {
        return IouContract::verify(tx);
    }

    match tx.outputs.iter().find_map(|output| match output {
        ContractState::Opaque { contract, .. } => Some(contract),
        ContractState::Obligation(_) => None,
    }) {
        Some(contract) => Err(ContractViolation::UnknownContract {
            contract: contract.clone(),
        }),
        None => Ok(()),
    }
}
