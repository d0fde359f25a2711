//! # Session Handler
//!
//! Accepts incoming sessions on a party's inbox. Each session gets its own
//! task, so one slow initiator does not block others.
//!
//! Session tasks live in a `JoinSet` owned by the handler. On shutdown the
//! handler stops accepting, aborts the sessions still in flight and waits for
//! them to unwind before returning.

use std::sync::Arc;

use iou_02_issuance::{BusSession, ResponderApi, ResponderError};
use ledger_telemetry::log_party_event;
use shared_bus::{Session, SessionInbox};
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::container::NodeResponder;

enum Step {
    Accepted(Session),
    Reaped,
    InboxClosed,
    ShutdownChanged { sender_dropped: bool },
}

/// Runs a party's responder for every session it is offered.
pub struct SessionHandler {
    inbox: SessionInbox,
    responder: Arc<NodeResponder>,
    shutdown: watch::Receiver<bool>,
    sessions: JoinSet<()>,
}

impl SessionHandler {
    pub fn new(
        inbox: SessionInbox,
        responder: Arc<NodeResponder>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            inbox,
            responder,
            shutdown,
            sessions: JoinSet::new(),
        }
    }

    /// Run until the router drops the inbox or shutdown is signalled.
    ///
    /// Returns the number of in-flight sessions cancelled by shutdown.
    pub async fn run(mut self) -> usize {
        let party = self.inbox.party().to_string();
        log_party_event!(info, "sessions", "Session handler started", party);

        let cancelled = loop {
            if *self.shutdown.borrow() {
                break self.drain().await;
            }

            let step = tokio::select! {
                accepted = self.inbox.accept() => match accepted {
                    Some(session) => Step::Accepted(session),
                    None => Step::InboxClosed,
                },
                Some(_) = self.sessions.join_next(), if !self.sessions.is_empty() => Step::Reaped,
                changed = self.shutdown.changed() => Step::ShutdownChanged {
                    sender_dropped: changed.is_err(),
                },
            };

            match step {
                Step::Accepted(session) => self.spawn_session(&party, session),
                Step::Reaped => {}
                Step::InboxClosed => {
                    // Let running sessions finish
                    while self.sessions.join_next().await.is_some() {}
                    break 0;
                }
                Step::ShutdownChanged { sender_dropped } => {
                    if sender_dropped {
                        break self.drain().await;
                    }
                }
            }
        };

        log_party_event!(info, "sessions", "Session handler stopped", party);
        cancelled
    }

    fn spawn_session(&mut self, party: &str, session: Session) {
        let responder = Arc::clone(&self.responder);
        let party = party.to_string();
        let session_id = session.id();
        let counterparty = session.counterparty().to_string();

        self.sessions.spawn(async move {
            match responder.respond(BusSession::from(session)).await {
                Ok(()) => {
                    debug!(party = %party, session = %session_id, "Session completed");
                }
                Err(ResponderError::Refused { reason }) => {
                    debug!(party = %party, counterparty = %counterparty, reason = %reason, "Session ended with refusal");
                }
                Err(e) => {
                    warn!(party = %party, counterparty = %counterparty, session = %session_id, error = %e, "Session failed");
                }
            }
        });
    }

    /// Abort in-flight sessions and wait for every task to finish.
    async fn drain(&mut self) -> usize {
        let in_flight = self.sessions.len();
        self.sessions.abort_all();
        while self.sessions.join_next().await.is_some() {}
        if in_flight > 0 {
            info!(party = %self.inbox.party(), sessions = in_flight, "Cancelled in-flight sessions");
        }
        in_flight
    }
}
