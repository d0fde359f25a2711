//! # iou-01-contract
//!
//! The IOU obligation record, the ledger transaction model, and the contract
//! that decides whether a proposed issuance is a legal state transition.
//!
//! ## Overview
//!
//! - **Obligation Record**: amount, lender, borrower and a stable linear id
//! - **Transaction Model**: immutable `WireTransaction` identified by the
//!   BLAKE3 digest of its canonical bytes, plus append-only signatures
//! - **Transition Validator**: `IouContract::verify`, six ordered rules,
//!   first failure wins
//!
//! ```text
//! TransactionBuilder ──→ WireTransaction ──verify──→ IouContract
//!                              │
//!                              └── sign(id) ──→ SignedTransaction ──notarise──→ FinalizedTransaction
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use iou_01_contract::{Amount, Command, ContractState, IouContract, ObligationRecord, TransactionBuilder};
//!
//! let record = ObligationRecord::new(Amount::new(10, "GBP"), alice, bob);
//! let keys = record.participant_keys();
//! let tx = TransactionBuilder::new(notary)
//!     .with_output(ContractState::Obligation(record))
//!     .with_command(Command::issue(keys))
//!     .to_wire_transaction();
//!
//! IouContract::verify(&tx)?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod contract;
pub mod domain;
pub mod error;

pub use contract::{verify_transaction, IouContract, IOU_CONTRACT_ID};
pub use domain::{
    Amount, Command, CommandKind, ContractState, FinalizedTransaction, ObligationRecord,
    SignedTransaction, StateRef, TransactionBuilder, TransactionSignature, WireTransaction,
};
pub use error::{ContractResult, ContractViolation, TransactionError};
