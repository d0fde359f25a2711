//! # End-to-End Issuance
//!
//! Runs the coordinator and responder of different parties against each
//! other over the session router, with a real notary.
//!
//! ## Flow Tested
//!
//! ```text
//! Alice (coordinator) ──SignatureRequest──→ Bob (responder)
//!                     ←─SignatureResponse──
//!                     ──notarise──→ Notary
//!                     ──Finalized─────────→ Bob records
//! ```

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use iou_01_contract::{
        Amount, Command, ContractState, ContractViolation, ObligationRecord, SignedTransaction,
        TransactionBuilder,
    };
    use iou_02_issuance::{
        BusMessaging, FailureKind, FlowMessaging, IssuanceApi, IssuanceError, KeyManagement,
        LocalKeyManager,
    };
    use iou_03_notary::NotaryApi;
    use node_runtime::{LedgerNetwork, NodeConfig};
    use shared_bus::{EventFilter, EventTopic, LedgerEvent, Subscription};
    use shared_types::{Party, SecureHash, SessionError};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn network() -> LedgerNetwork {
        LedgerNetwork::start(NodeConfig::default()).unwrap()
    }

    fn gbp(quantity: i64) -> Amount {
        Amount::new(quantity, "GBP")
    }

    /// Wait until `party` reports recording `tx_id`.
    async fn recorded_by(sub: &mut Subscription, tx_id: SecureHash, party: &str) -> bool {
        let expected = LedgerEvent::TransactionRecorded {
            tx_id,
            party: party.to_string(),
        };
        let wait = async {
            while let Some(event) = sub.recv().await {
                if event == expected {
                    return true;
                }
            }
            false
        };
        timeout(Duration::from_secs(5), wait).await.unwrap_or(false)
    }

    // =========================================================================
    // SCENARIOS
    // =========================================================================

    /// 10 GBP from Alice to Bob is finalized and recorded by both parties.
    #[tokio::test]
    async fn test_issue_ten_gbp_alice_to_bob() {
        let network = network();
        let mut sub = network.subscribe(EventFilter::topics(vec![EventTopic::Ledger]));
        let alice = network.node("Alice").unwrap();
        let bob = network.node("Bob").unwrap();

        let record =
            ObligationRecord::new(gbp(10), alice.identity().clone(), bob.identity().clone());
        let finalized = alice.coordinator().issue(record.clone()).await.unwrap();

        assert_eq!(
            finalized.tx().outputs,
            vec![ContractState::Obligation(record)]
        );
        assert!(finalized.tx().inputs.is_empty());
        assert_eq!(
            finalized.stx.signing_keys(),
            BTreeSet::from([alice.identity().owning_key, bob.identity().owning_key])
        );
        assert!(finalized.verify().is_ok());

        assert!(recorded_by(&mut sub, finalized.id(), "Bob").await);
        assert_eq!(network.router().sessions_opened(), 1);
        assert_eq!(alice.transaction(&finalized.id()), Some(finalized.clone()));
        assert_eq!(bob.transaction(&finalized.id()), Some(finalized));
        assert_eq!(network.notary().notarised_count(), 1);
    }

    /// A zero amount never leaves the lender.
    #[tokio::test]
    async fn test_zero_amount_aborts_locally() {
        let network = network();
        let mut sub = network.subscribe(EventFilter::topics(vec![EventTopic::Signing]));
        let alice = network.node("Alice").unwrap();
        let bob = network.party("Bob").unwrap();

        let err = alice.issue_to(&bob, gbp(0)).await.unwrap_err();

        assert_eq!(
            err,
            IssuanceError::Validation(ContractViolation::NonPositiveAmount { quantity: 0 })
        );
        assert_eq!(err.kind(), FailureKind::Validation);
        // No session was ever opened with Bob
        assert_eq!(network.router().sessions_opened(), 0);
        assert!(sub.drain().is_empty());
        assert_eq!(network.notary().notarised_count(), 0);
    }

    /// Lender and borrower must differ.
    #[tokio::test]
    async fn test_self_issuance_aborts_locally() {
        let network = network();
        let alice = network.node("Alice").unwrap();

        let err = alice
            .issue_to(&alice.identity().clone(), gbp(10))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            IssuanceError::Validation(ContractViolation::SameLenderAndBorrower)
        );
        assert_eq!(network.router().sessions_opened(), 0);
        assert_eq!(network.notary().notarised_count(), 0);
    }

    /// The responder refuses to sign a transaction whose output is not an
    /// obligation, and the coordinator sees the reason verbatim.
    #[tokio::test]
    async fn test_responder_refuses_non_obligation_output() {
        let network = network();
        let mut sub = network.subscribe(EventFilter::topics(vec![EventTopic::Signing]));
        let alice = network.node("Alice").unwrap();
        let bob = network.party("Bob").unwrap();
        let notary = network.notary().identity().clone();

        // Same key the network derived for Alice
        let alice_keys = LocalKeyManager::deterministic("Alice");
        assert_eq!(alice_keys.our_identity(), *alice.identity());

        let tx = TransactionBuilder::new(notary)
            .with_output(ContractState::Opaque {
                contract: "cash".into(),
                data: vec![1, 2, 3],
            })
            .with_command(Command::issue([alice.identity().owning_key, bob.owning_key]))
            .to_wire_transaction();
        let stx = SignedTransaction::new(tx.clone(), alice_keys.sign(&tx.id()));

        let messaging = BusMessaging::new(network.router(), "Alice");
        let mut session = messaging.initiate(&bob).await.unwrap();
        let err = alice
            .coordinator()
            .collect_signatures(&mut session, stx, &bob)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            IssuanceError::CounterpartyRejection {
                party: "Bob".into(),
                reason: "This must be an IOU transaction.".into(),
            }
        );
        assert_eq!(err.kind(), FailureKind::CounterpartyRejection);

        let refused = timeout(Duration::from_secs(5), sub.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            refused,
            LedgerEvent::SignatureRefused { ref party, .. } if party == "Bob"
        ));
        assert_eq!(network.notary().notarised_count(), 0);
        assert!(network.node("Bob").unwrap().ledger().is_empty());
    }

    /// A borrower that never answers fails the attempt with a session timeout.
    #[tokio::test]
    async fn test_unresponsive_borrower_times_out() {
        let mut config = NodeConfig::default();
        config.issuance.counterparty_timeout_secs = 1;
        let network = LedgerNetwork::start(config).unwrap();
        let alice = network.node("Alice").unwrap();

        // Dave is published and reachable but never accepts sessions
        let dave = LocalKeyManager::deterministic("Dave").our_identity();
        network.network_map().register_party(dave.clone());
        let _dave_inbox = network.router().register("Dave");

        let err = alice.issue_to(&dave, gbp(10)).await.unwrap_err();

        assert!(matches!(
            err,
            IssuanceError::Session(SessionError::Timeout { secs: 1, .. })
        ));
        assert!(alice.ledger().is_empty());
    }

    /// A borrower missing from the network map is rejected before any session.
    #[tokio::test]
    async fn test_unknown_borrower() {
        let network = network();
        let alice = network.node("Alice").unwrap();
        let mallory = Party::new("Mallory", [0x4du8; 32]);

        let err = alice.issue_to(&mallory, gbp(10)).await.unwrap_err();
        assert_eq!(
            err,
            IssuanceError::UnknownCounterparty {
                name: "Mallory".into()
            }
        );
    }

    /// Concurrent issuances between the same parties do not interfere.
    #[tokio::test]
    async fn test_concurrent_issuances() {
        let network = network();
        let alice = network.node("Alice").unwrap().coordinator();
        let lender = network.party("Alice").unwrap();
        let borrower = network.party("Bob").unwrap();

        let handles: Vec<_> = (1..=5)
            .map(|quantity| {
                let alice = Arc::clone(&alice);
                let record =
                    ObligationRecord::new(gbp(quantity), lender.clone(), borrower.clone());
                tokio::spawn(async move { alice.issue(record).await })
            })
            .collect();

        let mut ids = BTreeSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().unwrap().id());
        }
        assert_eq!(ids.len(), 5);
        assert_eq!(network.notary().notarised_count(), 5);
    }

    /// Progress events follow the state machine through to finalized.
    #[tokio::test]
    async fn test_progress_events_end_in_finalized() {
        let network = network();
        let mut sub = network.subscribe(EventFilter::topics(vec![EventTopic::Issuance]));
        let alice = network.node("Alice").unwrap();
        let bob = network.party("Bob").unwrap();

        alice.issue_to(&bob, gbp(3)).await.unwrap();

        let states: Vec<String> = sub
            .drain()
            .into_iter()
            .filter_map(|event| match event {
                LedgerEvent::IssuanceProgress { state, .. } => Some(state),
                _ => None,
            })
            .collect();
        assert_eq!(states.last().map(String::as_str), Some("finalized"));
        assert_eq!(states.len(), 5);
    }
}
