//! # Party Node
//!
//! One party's identity, ledger and protocol services.
//!
//! ```text
//! PartyNode
//!   ├── LocalKeyManager     (owning key)
//!   ├── InMemoryLedger      (finalized transactions)
//!   ├── NodeCoordinator     (initiates issuances as lender)
//!   └── NodeResponder       (answers issuance sessions as borrower)
//! ```

use std::sync::Arc;

use iou_01_contract::{Amount, FinalizedTransaction, ObligationRecord};
use iou_02_issuance::{
    BusMessaging, InMemoryLedger, InMemoryNetworkMap, IssuanceApi, IssuanceConfig,
    IssuanceCoordinator, IssuanceResponder, IssuanceResult, KeyManagement, LedgerStore,
    LocalKeyManager,
};
use shared_bus::{EventPublisher, SessionRouter};
use shared_types::{Party, SecureHash};
use tracing::info;

use crate::adapters::NotaryAdapter;

/// Coordinator over the runtime's concrete collaborators.
pub type NodeCoordinator = IssuanceCoordinator<
    InMemoryNetworkMap,
    LocalKeyManager,
    BusMessaging,
    NotaryAdapter,
    InMemoryLedger,
>;

/// Responder over the runtime's concrete collaborators.
pub type NodeResponder = IssuanceResponder<InMemoryNetworkMap, LocalKeyManager, InMemoryLedger>;

/// Services of one hosted party.
pub struct PartyNode {
    identity: Party,
    ledger: Arc<InMemoryLedger>,
    coordinator: Arc<NodeCoordinator>,
    responder: Arc<NodeResponder>,
}

impl PartyNode {
    /// Build a party's services. The party's key is derived from its name.
    pub fn new(
        name: &str,
        config: &IssuanceConfig,
        network_map: Arc<InMemoryNetworkMap>,
        router: Arc<SessionRouter>,
        notary: Arc<NotaryAdapter>,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        let keys = Arc::new(LocalKeyManager::deterministic(name));
        let identity = keys.our_identity();
        let ledger = Arc::new(InMemoryLedger::new());

        let coordinator = IssuanceCoordinator::new(
            config.clone(),
            Arc::clone(&network_map),
            Arc::clone(&keys),
            Arc::new(BusMessaging::new(router, name)),
            notary,
            Arc::clone(&ledger),
        )
        .with_event_publisher(Arc::clone(&events));

        let responder =
            IssuanceResponder::new(config.clone(), network_map, keys, Arc::clone(&ledger))
                .with_event_publisher(events);

        info!(
            party = %identity.name,
            key = %identity.key_fingerprint(),
            "Party node created"
        );

        Self {
            identity,
            ledger,
            coordinator: Arc::new(coordinator),
            responder: Arc::new(responder),
        }
    }

    #[must_use]
    pub fn identity(&self) -> &Party {
        &self.identity
    }

    #[must_use]
    pub fn coordinator(&self) -> Arc<NodeCoordinator> {
        Arc::clone(&self.coordinator)
    }

    #[must_use]
    pub fn responder(&self) -> Arc<NodeResponder> {
        Arc::clone(&self.responder)
    }

    #[must_use]
    pub fn ledger(&self) -> Arc<InMemoryLedger> {
        Arc::clone(&self.ledger)
    }

    /// Issue an IOU of `amount` owed to this party by `borrower`.
    pub async fn issue_to(
        &self,
        borrower: &Party,
        amount: Amount,
    ) -> IssuanceResult<FinalizedTransaction> {
        let record = ObligationRecord::new(amount, self.identity.clone(), borrower.clone());
        self.coordinator.issue(record).await
    }

    /// Finalized transaction `id`, if this party recorded it.
    #[must_use]
    pub fn transaction(&self, id: &SecureHash) -> Option<FinalizedTransaction> {
        self.ledger.transaction(id)
    }
}
