//! # Session Router
//!
//! Point-to-point sessions between two named parties.
//!
//! Every party registers once and receives a [`SessionInbox`]. Opening a
//! session towards a party creates a fresh duplex channel pair: the initiator
//! keeps one end, the other end is delivered to the target's inbox. Nothing
//! else can read from or write to that pair, so concurrent sessions between
//! the same two parties never see each other's traffic.
//!
//! Frames are wrapped in [`SessionEnvelope`]. The receiving end rejects frames
//! with an unsupported version, a stale or future timestamp, a foreign session
//! id, a foreign sender, or a sequence number other than the next expected one.

use crate::{INBOX_CAPACITY, SESSION_CHANNEL_CAPACITY};
use serde::de::DeserializeOwned;
use serde::Serialize;
use parking_lot::RwLock;
use shared_types::{unix_now, SessionEnvelope, SessionError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Routes new sessions to registered parties.
pub struct SessionRouter {
    inboxes: RwLock<HashMap<String, mpsc::Sender<Session>>>,
    channel_capacity: usize,
    opened: AtomicU64,
}

impl SessionRouter {
    /// Create a router with default per-session buffering.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(SESSION_CHANNEL_CAPACITY)
    }

    /// Create a router buffering `channel_capacity` frames per direction.
    #[must_use]
    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            inboxes: RwLock::new(HashMap::new()),
            channel_capacity: channel_capacity.max(1),
            opened: AtomicU64::new(0),
        }
    }

    /// Register a party and return the inbox its incoming sessions arrive on.
    ///
    /// Registering the same name again replaces the previous inbox.
    pub fn register(&self, party: impl Into<String>) -> SessionInbox {
        let party = party.into();
        let (sender, receiver) = mpsc::channel(INBOX_CAPACITY);
        if self.inboxes.write().insert(party.clone(), sender).is_some() {
            warn!(party = %party, "Replaced existing session inbox");
        }
        debug!(party = %party, "Party registered with session router");
        SessionInbox { party, receiver }
    }

    /// Remove a party. Later `open` calls towards it fail with `UnknownParty`.
    pub fn deregister(&self, party: &str) {
        if self.inboxes.write().remove(party).is_some() {
            debug!(party = %party, "Party deregistered from session router");
        }
    }

    /// Returns true if `party` currently has an inbox.
    #[must_use]
    pub fn is_registered(&self, party: &str) -> bool {
        self.inboxes.read().contains_key(party)
    }

    /// Number of sessions delivered to a party's inbox since creation.
    #[must_use]
    pub fn sessions_opened(&self) -> u64 {
        self.opened.load(Ordering::Relaxed)
    }

    /// Open a new session from `from` to `to`.
    ///
    /// The responder half is queued on `to`'s inbox before this returns.
    pub async fn open(&self, from: &str, to: &str) -> Result<Session, SessionError> {
        let inbox = self
            .inboxes
            .read()
            .get(to)
            .cloned()
            .ok_or_else(|| SessionError::UnknownParty(to.to_string()))?;

        let (initiator_tx, responder_rx) = mpsc::channel(self.channel_capacity);
        let (responder_tx, initiator_rx) = mpsc::channel(self.channel_capacity);
        let session_id = Uuid::new_v4();

        let initiator = Session::new(session_id, from, to, initiator_tx, initiator_rx);
        let responder = Session::new(session_id, to, from, responder_tx, responder_rx);

        inbox
            .send(responder)
            .await
            .map_err(|_| SessionError::PartyUnreachable(to.to_string()))?;
        self.opened.fetch_add(1, Ordering::Relaxed);

        debug!(session_id = %session_id, from = from, to = to, "Session opened");
        Ok(initiator)
    }
}

impl Default for SessionRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Incoming sessions for one registered party.
pub struct SessionInbox {
    party: String,
    receiver: mpsc::Receiver<Session>,
}

impl SessionInbox {
    /// Wait for the next session opened towards this party.
    ///
    /// Returns `None` once the router has been dropped or the party deregistered.
    pub async fn accept(&mut self) -> Option<Session> {
        self.receiver.recv().await
    }

    /// Name of the party owning this inbox.
    #[must_use]
    pub fn party(&self) -> &str {
        &self.party
    }
}

/// One end of a point-to-point session.
pub struct Session {
    id: Uuid,
    local: String,
    counterparty: String,
    sender: mpsc::Sender<SessionEnvelope>,
    receiver: mpsc::Receiver<SessionEnvelope>,
    next_send: u64,
    next_recv: u64,
}

impl Session {
    fn new(
        id: Uuid,
        local: &str,
        counterparty: &str,
        sender: mpsc::Sender<SessionEnvelope>,
        receiver: mpsc::Receiver<SessionEnvelope>,
    ) -> Self {
        Self {
            id,
            local: local.to_string(),
            counterparty: counterparty.to_string(),
            sender,
            receiver,
            next_send: 0,
            next_recv: 0,
        }
    }

    /// Session identifier shared by both ends.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the party holding this end.
    #[must_use]
    pub fn local_party(&self) -> &str {
        &self.local
    }

    /// Name of the party at the other end.
    #[must_use]
    pub fn counterparty(&self) -> &str {
        &self.counterparty
    }

    /// Send a raw payload as the next frame.
    pub async fn send_bytes(&mut self, payload: Vec<u8>) -> Result<(), SessionError> {
        let envelope = SessionEnvelope::new(
            self.id,
            self.local.clone(),
            self.counterparty.clone(),
            self.next_send,
            payload,
        );
        self.sender
            .send(envelope)
            .await
            .map_err(|_| SessionError::Closed {
                session_id: self.id,
            })?;
        self.next_send += 1;
        Ok(())
    }

    /// Receive the next frame's payload, validating its envelope.
    pub async fn receive_bytes(&mut self) -> Result<Vec<u8>, SessionError> {
        let envelope = self.receiver.recv().await.ok_or(SessionError::Closed {
            session_id: self.id,
        })?;
        self.accept_envelope(envelope)
    }

    /// Encode and send a message.
    pub async fn send<T: Serialize + Sync>(&mut self, message: &T) -> Result<(), SessionError> {
        let payload =
            bincode::serialize(message).map_err(|e| SessionError::Codec(e.to_string()))?;
        self.send_bytes(payload).await
    }

    /// Receive and decode the next message.
    pub async fn receive<T: DeserializeOwned>(&mut self) -> Result<T, SessionError> {
        let payload = self.receive_bytes().await?;
        bincode::deserialize(&payload).map_err(|e| SessionError::Codec(e.to_string()))
    }

    /// Receive and decode the next message, giving up after `limit`.
    pub async fn receive_timeout<T: DeserializeOwned>(
        &mut self,
        limit: Duration,
    ) -> Result<T, SessionError> {
        match tokio::time::timeout(limit, self.receive()).await {
            Ok(result) => result,
            Err(_) => Err(SessionError::Timeout {
                party: self.counterparty.clone(),
                secs: limit.as_secs(),
            }),
        }
    }

    fn accept_envelope(&mut self, envelope: SessionEnvelope) -> Result<Vec<u8>, SessionError> {
        if !envelope.is_supported_version() {
            return Err(SessionError::UnsupportedVersion {
                received: envelope.version,
                supported: SessionEnvelope::CURRENT_VERSION,
            });
        }
        let now = unix_now();
        if !envelope.is_timestamp_valid(now) {
            warn!(
                session_id = %self.id,
                sender = %envelope.sender,
                timestamp = envelope.timestamp,
                now,
                "Rejected frame outside timestamp window"
            );
            return Err(SessionError::TimestampOutOfRange {
                timestamp: envelope.timestamp,
                now,
            });
        }
        if envelope.session_id != self.id {
            return Err(SessionError::SessionMismatch {
                expected: self.id,
                actual: envelope.session_id,
            });
        }
        if envelope.sender != self.counterparty {
            return Err(SessionError::UnexpectedMessage(format!(
                "frame from {} on session with {}",
                envelope.sender, self.counterparty
            )));
        }
        if envelope.sequence != self.next_recv {
            return Err(SessionError::OutOfOrder {
                expected: self.next_recv,
                actual: envelope.sequence,
            });
        }
        self.next_recv += 1;
        Ok(envelope.payload)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("local", &self.local)
            .field("counterparty", &self.counterparty)
            .field("next_send", &self.next_send)
            .field("next_recv", &self.next_recv)
            .finish()
    }
}
