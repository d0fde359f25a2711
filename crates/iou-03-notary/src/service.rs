//! Notary Service - uniqueness sequencing and finality signatures

use crate::config::NotaryConfig;
use crate::domain::UniquenessRegistry;
use crate::error::{NotaryError, NotaryResult};
use crate::ports::inbound::NotaryApi;
use async_trait::async_trait;
use iou_01_contract::{
    verify_transaction, FinalizedTransaction, SignedTransaction, StateRef, TransactionSignature,
};
use parking_lot::Mutex;
use shared_bus::{EventPublisher, LedgerEvent};
use shared_crypto::Ed25519KeyPair;
use shared_types::{Party, SecureHash};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Internal state, guarded by one lock so check-and-commit is atomic.
struct NotaryState {
    registry: UniquenessRegistry,
    signed: HashMap<SecureHash, TransactionSignature>,
}

/// Single-node notary.
///
/// Checks that it is the named notary, that every required party has signed,
/// optionally re-runs contract verification, then marks the inputs consumed
/// and signs the transaction id.
pub struct NotaryService {
    config: NotaryConfig,
    identity: Party,
    keypair: Ed25519KeyPair,
    state: Mutex<NotaryState>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl NotaryService {
    pub fn new(config: NotaryConfig, keypair: Ed25519KeyPair) -> Self {
        let identity = Party::new(config.name.clone(), keypair.public_key().to_bytes());
        info!(
            notary = %identity.name,
            key = %identity.key_fingerprint(),
            validating = config.validating,
            "Notary initialized"
        );
        Self {
            config,
            identity,
            keypair,
            state: Mutex::new(NotaryState {
                registry: UniquenessRegistry::new(),
                signed: HashMap::new(),
            }),
            events: None,
        }
    }

    /// Publish `TransactionNotarised` events to `events`.
    #[must_use]
    pub fn with_event_publisher(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = Some(events);
        self
    }

    #[must_use]
    pub fn is_validating(&self) -> bool {
        self.config.validating
    }

    /// Number of transactions signed so far.
    #[must_use]
    pub fn notarised_count(&self) -> usize {
        self.state.lock().signed.len()
    }

    fn check(&self, stx: &SignedTransaction) -> NotaryResult<()> {
        if stx.tx.notary != self.identity {
            return Err(NotaryError::WrongNotary {
                expected: self.identity.name.clone(),
                actual: stx.tx.notary.name.clone(),
            });
        }

        stx.verify_required_signatures()?;

        if self.config.validating {
            verify_transaction(&stx.tx)?;
        }
        Ok(())
    }

    /// Returns the notary signature and whether it was newly produced.
    fn commit(
        &self,
        stx: &SignedTransaction,
        tx_id: SecureHash,
    ) -> NotaryResult<(TransactionSignature, bool)> {
        let mut state = self.state.lock();

        if let Some(existing) = state.signed.get(&tx_id) {
            return Ok((existing.clone(), false));
        }

        state
            .registry
            .commit(tx_id, &stx.tx.inputs)
            .map_err(|conflicts| NotaryError::Conflict { tx_id, conflicts })?;

        let signature = TransactionSignature::new(
            self.identity.owning_key,
            self.keypair.sign(tx_id.as_bytes()).to_bytes(),
        );
        state.signed.insert(tx_id, signature.clone());
        Ok((signature, true))
    }
}

#[async_trait]
impl NotaryApi for NotaryService {
    async fn notarise(&self, stx: SignedTransaction) -> NotaryResult<FinalizedTransaction> {
        let tx_id = stx.id();

        if let Err(e) = self.check(&stx) {
            warn!(
                tx_id = %tx_id.short(),
                notary = %self.identity.name,
                error = %e,
                "Notarisation refused"
            );
            return Err(e);
        }

        let (notary_signature, fresh) = match self.commit(&stx, tx_id) {
            Ok(result) => result,
            Err(e) => {
                warn!(
                    tx_id = %tx_id.short(),
                    notary = %self.identity.name,
                    error = %e,
                    "Double spend refused"
                );
                return Err(e);
            }
        };

        if fresh {
            info!(
                tx_id = %tx_id.short(),
                notary = %self.identity.name,
                inputs = stx.tx.inputs.len(),
                "Transaction notarised"
            );
            if let Some(events) = &self.events {
                events
                    .publish(LedgerEvent::TransactionNotarised {
                        tx_id,
                        notary: self.identity.name.clone(),
                    })
                    .await;
            }
        } else {
            debug!(tx_id = %tx_id.short(), "Re-submission of notarised transaction");
        }

        Ok(FinalizedTransaction {
            stx,
            notary_signature,
        })
    }

    fn identity(&self) -> &Party {
        &self.identity
    }

    async fn consumer_of(&self, state: StateRef) -> Option<SecureHash> {
        self.state.lock().registry.consumer_of(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iou_01_contract::{
        Amount, Command, CommandKind, ContractState, ObligationRecord, TransactionBuilder,
        TransactionError, WireTransaction,
    };
    use shared_bus::{EventFilter, EventSubscriber, InMemoryEventBus};

    struct Parties {
        alice: Ed25519KeyPair,
        bob: Ed25519KeyPair,
    }

    impl Parties {
        fn new() -> Self {
            Self {
                alice: Ed25519KeyPair::from_seed([1u8; 32]),
                bob: Ed25519KeyPair::from_seed([2u8; 32]),
            }
        }

        fn alice(&self) -> Party {
            Party::new("Alice", self.alice.public_key().to_bytes())
        }

        fn bob(&self) -> Party {
            Party::new("Bob", self.bob.public_key().to_bytes())
        }

        fn sign_all(&self, tx: WireTransaction) -> SignedTransaction {
            let id = tx.id();
            let sig = |k: &Ed25519KeyPair| {
                TransactionSignature::new(
                    k.public_key().to_bytes(),
                    k.sign(id.as_bytes()).to_bytes(),
                )
            };
            SignedTransaction::new(tx, sig(&self.alice)).with_signature(sig(&self.bob))
        }
    }

    fn notary(validating: bool) -> NotaryService {
        let config = NotaryConfig {
            name: "Notary".to_string(),
            validating,
        };
        NotaryService::new(config, Ed25519KeyPair::from_seed([7u8; 32]))
    }

    fn issuance(parties: &Parties, notary: &Party, quantity: i64) -> WireTransaction {
        let record =
            ObligationRecord::new(Amount::new(quantity, "GBP"), parties.alice(), parties.bob());
        let keys = record.participant_keys();
        TransactionBuilder::new(notary.clone())
            .with_output(ContractState::Obligation(record))
            .with_command(Command::issue(keys))
            .to_wire_transaction()
    }

    fn spend(parties: &Parties, notary: &Party, input: StateRef, tag: u8) -> WireTransaction {
        TransactionBuilder::new(notary.clone())
            .with_input(input)
            .with_output(ContractState::Opaque {
                contract: "cash".into(),
                data: vec![tag],
            })
            .with_command(Command::new(
                CommandKind::Other("move".into()),
                [
                    parties.alice.public_key().to_bytes(),
                    parties.bob.public_key().to_bytes(),
                ],
            ))
            .to_wire_transaction()
    }

    #[tokio::test]
    async fn test_notarise_valid_issuance() {
        let parties = Parties::new();
        let notary = notary(true);
        let stx = parties.sign_all(issuance(&parties, notary.identity(), 10));

        let finalized = notary.notarise(stx.clone()).await.unwrap();
        assert_eq!(finalized.id(), stx.id());
        assert!(finalized.verify().is_ok());
        assert_eq!(notary.notarised_count(), 1);
    }

    #[tokio::test]
    async fn test_wrong_notary_refused() {
        let parties = Parties::new();
        let notary = notary(true);
        let other = Party::new("Other Notary", [8u8; 32]);
        let stx = parties.sign_all(issuance(&parties, &other, 10));

        assert!(matches!(
            notary.notarise(stx).await,
            Err(NotaryError::WrongNotary { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_signature_refused() {
        let parties = Parties::new();
        let notary = notary(false);
        let tx = issuance(&parties, notary.identity(), 10);
        let id = tx.id();
        let stx = SignedTransaction::new(
            tx,
            TransactionSignature::new(
                parties.alice.public_key().to_bytes(),
                parties.alice.sign(id.as_bytes()).to_bytes(),
            ),
        );

        assert!(matches!(
            notary.notarise(stx).await,
            Err(NotaryError::InvalidSignatures(TransactionError::MissingSignatures { .. }))
        ));
    }

    #[tokio::test]
    async fn test_validating_notary_reruns_contract() {
        let parties = Parties::new();
        let validating = notary(true);
        let stx = parties.sign_all(issuance(&parties, validating.identity(), 0));

        assert!(matches!(
            validating.notarise(stx.clone()).await,
            Err(NotaryError::TransactionInvalid(_))
        ));

        // A uniqueness-only notary does not look at contract rules
        let plain = notary(false);
        assert!(plain.notarise(stx).await.is_ok());
    }

    #[tokio::test]
    async fn test_resubmission_is_idempotent() {
        let parties = Parties::new();
        let notary = notary(false);
        let input = StateRef::new(SecureHash::new([4u8; 32]), 0);
        let stx = parties.sign_all(spend(&parties, notary.identity(), input, 1));

        let first = notary.notarise(stx.clone()).await.unwrap();
        let second = notary.notarise(stx).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(notary.notarised_count(), 1);
    }

    #[tokio::test]
    async fn test_double_spend_conflict() {
        let parties = Parties::new();
        let notary = notary(false);
        let input = StateRef::new(SecureHash::new([4u8; 32]), 0);
        let first = parties.sign_all(spend(&parties, notary.identity(), input, 1));
        let second = parties.sign_all(spend(&parties, notary.identity(), input, 2));

        notary.notarise(first.clone()).await.unwrap();
        let err = notary.notarise(second).await.unwrap_err();

        assert!(err.is_conflict());
        match err {
            NotaryError::Conflict { conflicts, .. } => {
                assert_eq!(conflicts, vec![(input, first.id())]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(notary.consumer_of(input).await, Some(first.id()));
    }

    #[tokio::test]
    async fn test_concurrent_spends_exactly_one_wins() {
        let parties = Parties::new();
        let notary = Arc::new(notary(false));
        let input = StateRef::new(SecureHash::new([4u8; 32]), 0);

        let handles: Vec<_> = (0..8u8)
            .map(|tag| {
                let stx = parties.sign_all(spend(&parties, notary.identity(), input, tag));
                let notary = notary.clone();
                tokio::spawn(async move { notary.notarise(stx).await })
            })
            .collect();

        let mut successes = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) if e.is_conflict() => conflicts += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn test_publishes_notarised_event() {
        let parties = Parties::new();
        let bus = Arc::new(InMemoryEventBus::new());
        let mut sub = bus.subscribe(EventFilter::all());
        let notary = notary(true).with_event_publisher(bus.clone());
        let stx = parties.sign_all(issuance(&parties, notary.identity(), 10));

        notary.notarise(stx.clone()).await.unwrap();
        // Re-submission does not publish again
        notary.notarise(stx.clone()).await.unwrap();

        let events = sub.drain();
        assert_eq!(
            events,
            vec![LedgerEvent::TransactionNotarised {
                tx_id: stx.id(),
                notary: "Notary".to_string()
            }]
        );
    }
}
