//! Flow messaging adapter over the shared-bus session router

use crate::messages::IssuanceMessage;
use crate::ports::outbound::{CounterpartySession, FlowMessaging};
use async_trait::async_trait;
use shared_bus::{Session, SessionRouter};
use shared_types::{Party, SessionError};
use std::sync::Arc;
use std::time::Duration;

/// Opens router sessions on behalf of one local party.
pub struct BusMessaging {
    router: Arc<SessionRouter>,
    local: String,
}

impl BusMessaging {
    pub fn new(router: Arc<SessionRouter>, local: impl Into<String>) -> Self {
        Self {
            router,
            local: local.into(),
        }
    }
}

#[async_trait]
impl FlowMessaging for BusMessaging {
    type Session = BusSession;

    async fn initiate(&self, counterparty: &Party) -> Result<BusSession, SessionError> {
        let session = self.router.open(&self.local, &counterparty.name).await?;
        Ok(BusSession::new(session))
    }
}

/// Issuance messages over a router session.
#[derive(Debug)]
pub struct BusSession {
    inner: Session,
}

impl BusSession {
    pub fn new(inner: Session) -> Self {
        Self { inner }
    }
}

impl From<Session> for BusSession {
    fn from(inner: Session) -> Self {
        Self::new(inner)
    }
}

#[async_trait]
impl CounterpartySession for BusSession {
    fn counterparty(&self) -> &str {
        self.inner.counterparty()
    }

    async fn send(&mut self, message: &IssuanceMessage) -> Result<(), SessionError> {
        self.inner.send(message).await
    }

    async fn receive(&mut self, timeout: Duration) -> Result<IssuanceMessage, SessionError> {
        self.inner.receive_timeout(timeout).await
    }
}
