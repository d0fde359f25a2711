//! # Notary Conflicts
//!
//! Two or more fully signed transactions consuming the same input reach the
//! notary at once. Exactly one is finalized; every other one is told which
//! input was already consumed and by whom.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use iou_01_contract::{
        Command, CommandKind, ContractState, SignedTransaction, StateRef, TransactionBuilder,
    };
    use iou_02_issuance::{KeyManagement, LocalKeyManager, NotaryGateway, NotaryGatewayError};
    use iou_03_notary::{NotaryApi, NotaryConfig, NotaryError, NotaryService};
    use node_runtime::adapters::NotaryAdapter;
    use node_runtime::{LedgerNetwork, NodeConfig};
    use shared_crypto::Ed25519KeyPair;
    use shared_types::{Party, SecureHash};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    struct Signers {
        alice: LocalKeyManager,
        bob: LocalKeyManager,
    }

    impl Signers {
        fn new() -> Self {
            Self {
                alice: LocalKeyManager::deterministic("Alice"),
                bob: LocalKeyManager::deterministic("Bob"),
            }
        }

        /// A fully signed transaction spending `input`. `tag` makes each one
        /// distinct.
        fn spend(&self, notary: &Party, input: StateRef, tag: u8) -> SignedTransaction {
            let keys = [
                self.alice.our_identity().owning_key,
                self.bob.our_identity().owning_key,
            ];
            let tx = TransactionBuilder::new(notary.clone())
                .with_input(input)
                .with_output(ContractState::Opaque {
                    contract: "cash".into(),
                    data: vec![tag],
                })
                .with_command(Command::new(CommandKind::Other("move".into()), keys))
                .to_wire_transaction();
            let id = tx.id();
            SignedTransaction::new(tx, self.alice.sign(&id)).with_signature(self.bob.sign(&id))
        }
    }

    fn consumed_input() -> StateRef {
        StateRef::new(SecureHash::new([0x42u8; 32]), 0)
    }

    fn notary() -> Arc<NotaryService> {
        Arc::new(NotaryService::new(
            NotaryConfig::non_validating("Notary"),
            Ed25519KeyPair::generate(),
        ))
    }

    // =========================================================================
    // SCENARIOS
    // =========================================================================

    /// Two transactions sharing an input, submitted concurrently: one wins.
    #[tokio::test]
    async fn test_concurrent_double_spend_exactly_one_wins() {
        let signers = Signers::new();
        let notary = notary();
        let input = consumed_input();

        let first = signers.spend(notary.identity(), input, 1);
        let second = signers.spend(notary.identity(), input, 2);

        let (a, b) = tokio::join!(
            {
                let notary = Arc::clone(&notary);
                let stx = first.clone();
                tokio::spawn(async move { notary.notarise(stx).await })
            },
            {
                let notary = Arc::clone(&notary);
                let stx = second.clone();
                tokio::spawn(async move { notary.notarise(stx).await })
            }
        );
        let results = [a.unwrap(), b.unwrap()];

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        let winner = winners[0].id();
        assert!(winner == first.id() || winner == second.id());

        let loser = results
            .iter()
            .find_map(|r| r.as_ref().err())
            .unwrap();
        match loser {
            NotaryError::Conflict { conflicts, .. } => {
                assert_eq!(conflicts, &vec![(input, winner)]);
            }
            other => panic!("expected conflict, got {other}"),
        }
        assert_eq!(notary.consumer_of(input).await, Some(winner));
    }

    /// Many concurrent spends through the runtime's notary adapter.
    #[tokio::test]
    async fn test_many_spends_through_gateway() {
        let signers = Signers::new();
        let notary = notary();
        let gateway = Arc::new(NotaryAdapter::new(Arc::clone(&notary)));
        let input = consumed_input();

        let handles: Vec<_> = (0..16u8)
            .map(|tag| {
                let stx = signers.spend(notary.identity(), input, tag);
                let gateway = Arc::clone(&gateway);
                tokio::spawn(async move { gateway.notarise(stx).await })
            })
            .collect();

        let mut finalized = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => finalized += 1,
                Err(NotaryGatewayError::Conflict { conflicts: refs }) => {
                    assert_eq!(refs, vec![input]);
                    conflicts += 1;
                }
                Err(other) => panic!("unexpected rejection: {other}"),
            }
        }
        assert_eq!(finalized, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(notary.notarised_count(), 1);
    }

    /// Re-submitting the winning transaction is not a conflict with itself.
    #[tokio::test]
    async fn test_winner_resubmission_is_idempotent() {
        let signers = Signers::new();
        let notary = notary();
        let stx = signers.spend(notary.identity(), consumed_input(), 1);

        let first = notary.notarise(stx.clone()).await.unwrap();
        let again = notary.notarise(stx).await.unwrap();
        assert_eq!(first, again);
    }

    /// Issuances have no inputs, so they never conflict with each other.
    #[tokio::test]
    async fn test_issuances_do_not_conflict() {
        let network = LedgerNetwork::start(NodeConfig::default()).unwrap();
        let alice = network.node("Alice").unwrap();
        let bob = network.party("Bob").unwrap();

        for quantity in 1..=3 {
            alice
                .issue_to(&bob, iou_01_contract::Amount::new(quantity, "GBP"))
                .await
                .unwrap();
        }
        assert_eq!(network.notary().notarised_count(), 3);
    }
}
