//! # Ledger Network
//!
//! Builds and runs every hosted party around one notary.
//!
//! ```text
//!                 ┌──────────────── EVENT BUS ────────────────┐
//!                 │        (LedgerEvent broadcast)            │
//!                 └───▲──────────────▲──────────────▲─────────┘
//!                     │              │              │
//!              ┌──────┴─────┐  ┌─────┴──────┐  ┌────┴────┐
//!              │  Alice     │  │   Bob      │  │ Notary  │
//!              │ coordinator│  │ responder  │  │         │
//!              └──────┬─────┘  └─────▲──────┘  └────▲────┘
//!                     │   session    │              │
//!                     └──── ROUTER ──┘              │
//!                     │                             │
//!                     └────── NotaryAdapter ────────┘
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Validate configuration
//! 2. Create the notary and publish it on the network map
//! 3. Create each party, publish it, register its session inbox
//! 4. Spawn one session handler per party and the event log handler
//!
//! ## Shutdown
//!
//! `shutdown` deregisters every party and signals the handlers. Session
//! handlers abort their in-flight responders; `shutdown_and_wait` also waits
//! until every handler has drained.

use std::collections::BTreeMap;
use std::sync::Arc;

use iou_02_issuance::InMemoryNetworkMap;
use parking_lot::Mutex;
use iou_03_notary::{NotaryApi, NotaryService};
use shared_bus::{
    EventFilter, EventPublisher, EventSubscriber, InMemoryEventBus, SessionRouter, Subscription,
};
use shared_crypto::Ed25519KeyPair;
use shared_types::Party;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::adapters::NotaryAdapter;
use crate::container::{ConfigError, NodeConfig, PartyNode};
use crate::handlers::{EventLogHandler, SessionHandler};

/// A running in-process ledger network.
pub struct LedgerNetwork {
    config: NodeConfig,
    router: Arc<SessionRouter>,
    events: Arc<InMemoryEventBus>,
    network_map: Arc<InMemoryNetworkMap>,
    notary: Arc<NotaryService>,
    nodes: BTreeMap<String, PartyNode>,
    shutdown_tx: watch::Sender<bool>,
    session_handlers: Mutex<Vec<JoinHandle<usize>>>,
}

impl LedgerNetwork {
    /// Validate `config`, build every party and start their handlers.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: NodeConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let router = Arc::new(SessionRouter::new());
        let events = Arc::new(InMemoryEventBus::new());
        let publisher: Arc<dyn EventPublisher> = events.clone();
        let network_map = Arc::new(InMemoryNetworkMap::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        // Event log first, so startup events are not missed
        Self::spawn_guarded(
            EventLogHandler::new(events.subscribe(EventFilter::all())).run(),
            shutdown_rx.clone(),
            "events",
        );

        let notary = Arc::new(
            NotaryService::new(config.notary.clone(), Ed25519KeyPair::generate())
                .with_event_publisher(Arc::clone(&publisher)),
        );
        network_map.register_notary(notary.identity().clone());
        let notary_adapter = Arc::new(NotaryAdapter::new(Arc::clone(&notary)));

        let mut nodes = BTreeMap::new();
        let mut session_handlers = Vec::with_capacity(config.parties.len());
        for name in &config.parties {
            let node = PartyNode::new(
                name,
                &config.issuance,
                Arc::clone(&network_map),
                Arc::clone(&router),
                Arc::clone(&notary_adapter),
                Arc::clone(&publisher),
            );
            network_map.register_party(node.identity().clone());

            let inbox = router.register(name.as_str());
            session_handlers.push(tokio::spawn(
                SessionHandler::new(inbox, node.responder(), shutdown_rx.clone()).run(),
            ));
            nodes.insert(name.clone(), node);
        }

        info!(
            parties = nodes.len(),
            notary = %notary.identity().name,
            validating = notary.is_validating(),
            "Ledger network started"
        );

        Ok(Self {
            config,
            router,
            events,
            network_map,
            notary,
            nodes,
            shutdown_tx,
            session_handlers: Mutex::new(session_handlers),
        })
    }

    fn spawn_guarded<F>(task: F, mut shutdown: watch::Receiver<bool>, component: &'static str)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        tokio::spawn(async move {
            tokio::select! {
                _ = task => {}
                _ = shutdown.changed() => {
                    info!(component, "Shutdown signal received");
                }
            }
        });
    }

    /// Stop accepting sessions and stop all handlers.
    pub fn shutdown(&self) {
        info!("Initiating shutdown...");
        for name in self.nodes.keys() {
            self.router.deregister(name);
        }
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to send shutdown signal: {}", e);
        }
    }

    /// Shut down and wait for every session handler to drain.
    ///
    /// Returns the number of in-flight sessions that were cancelled.
    pub async fn shutdown_and_wait(&self) -> usize {
        self.shutdown();
        let handlers = std::mem::take(&mut *self.session_handlers.lock());

        let mut cancelled = 0;
        for handler in handlers {
            match handler.await {
                Ok(count) => cancelled += count,
                Err(e) => warn!(error = %e, "Session handler ended abnormally"),
            }
        }
        info!(cancelled, "Shutdown complete");
        cancelled
    }

    #[must_use]
    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// A hosted party's services.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&PartyNode> {
        self.nodes.get(name)
    }

    /// Hosted parties, by name.
    pub fn nodes(&self) -> impl Iterator<Item = &PartyNode> {
        self.nodes.values()
    }

    /// A hosted party's well-known identity.
    #[must_use]
    pub fn party(&self, name: &str) -> Option<Party> {
        self.nodes.get(name).map(|node| node.identity().clone())
    }

    #[must_use]
    pub fn notary(&self) -> Arc<NotaryService> {
        Arc::clone(&self.notary)
    }

    #[must_use]
    pub fn network_map(&self) -> Arc<InMemoryNetworkMap> {
        Arc::clone(&self.network_map)
    }

    #[must_use]
    pub fn router(&self) -> Arc<SessionRouter> {
        Arc::clone(&self.router)
    }

    #[must_use]
    pub fn events(&self) -> Arc<InMemoryEventBus> {
        Arc::clone(&self.events)
    }

    /// Subscribe to ledger events.
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        self.events.subscribe(filter)
    }
}

impl Drop for LedgerNetwork {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}
