//! Domain layer: obligation record and transaction model.

mod encoding;
pub mod obligation;
pub mod signed;
pub mod transaction;

pub use obligation::{Amount, ObligationRecord};
pub use signed::{FinalizedTransaction, SignedTransaction, TransactionSignature};
pub use transaction::{
    Command, CommandKind, ContractState, StateRef, TransactionBuilder, WireTransaction,
};
