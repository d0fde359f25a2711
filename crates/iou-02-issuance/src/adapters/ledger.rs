//! Ledger store adapter

use crate::ports::outbound::LedgerStore;
use iou_01_contract::FinalizedTransaction;
use parking_lot::RwLock;
use shared_types::SecureHash;
use std::collections::HashMap;

/// Finalized transactions held in memory, keyed by id.
#[derive(Default)]
pub struct InMemoryLedger {
    transactions: RwLock<HashMap<SecureHash, FinalizedTransaction>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.transactions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.read().is_empty()
    }
}

impl LedgerStore for InMemoryLedger {
    fn record(&self, tx: FinalizedTransaction) -> bool {
        let id = tx.id();
        let mut transactions = self.transactions.write();
        if transactions.contains_key(&id) {
            return false;
        }
        transactions.insert(id, tx);
        true
    }

    fn transaction(&self, id: &SecureHash) -> Option<FinalizedTransaction> {
        self.transactions.read().get(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{keypair, party, MockNotary};
    use iou_01_contract::{
        Amount, Command, ContractState, ObligationRecord, SignedTransaction, TransactionBuilder,
        TransactionSignature,
    };

    fn finalized(quantity: i64) -> FinalizedTransaction {
        let notary = MockNotary::new();
        let alice_keys = keypair(1);
        let alice = party("Alice", &alice_keys);
        let bob = party("Bob", &keypair(2));
        let record = ObligationRecord::new(Amount::new(quantity, "GBP"), alice.clone(), bob);
        let keys = record.participant_keys();
        let tx = TransactionBuilder::new(notary.identity.clone())
            .with_output(ContractState::Obligation(record))
            .with_command(Command::issue(keys))
            .to_wire_transaction();
        let sig = TransactionSignature::new(
            alice.owning_key,
            alice_keys.sign(tx.id().as_bytes()).to_bytes(),
        );
        notary.finalize(SignedTransaction::new(tx, sig))
    }

    #[test]
    fn test_record_and_lookup() {
        let ledger = InMemoryLedger::new();
        let tx = finalized(10);

        assert!(ledger.record(tx.clone()));
        assert_eq!(ledger.transaction(&tx.id()), Some(tx));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_second_record_is_ignored() {
        let ledger = InMemoryLedger::new();
        let tx = finalized(10);

        assert!(ledger.record(tx.clone()));
        assert!(!ledger.record(tx));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_unknown_id() {
        let ledger = InMemoryLedger::new();
        ledger.record(finalized(1));
        assert!(ledger.transaction(&finalized(2).id()).is_none());
    }
}
