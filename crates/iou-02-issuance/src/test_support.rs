//! Hand-written port mocks shared by the coordinator and responder tests.

use crate::messages::IssuanceMessage;
use crate::ports::outbound::{
    CounterpartySession, FlowMessaging, NotaryGateway, NotaryGatewayError,
};
use async_trait::async_trait;
use iou_01_contract::{FinalizedTransaction, SignedTransaction, TransactionSignature};
use parking_lot::Mutex;
use shared_crypto::Ed25519KeyPair;
use shared_types::{Party, SessionError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Computes the counterparty's reply to each message we send.
pub type Script = Arc<dyn Fn(&IssuanceMessage) -> Option<IssuanceMessage> + Send + Sync>;

/// Session whose counterparty is a closure.
pub struct ScriptedSession {
    counterparty: String,
    inbox: VecDeque<IssuanceMessage>,
    script: Script,
    pub sent: Arc<Mutex<Vec<IssuanceMessage>>>,
}

impl ScriptedSession {
    pub fn new(counterparty: &str, script: Script) -> Self {
        Self {
            counterparty: counterparty.to_string(),
            inbox: VecDeque::new(),
            script,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queue a message as if the counterparty had already sent it.
    pub fn with_incoming(mut self, message: IssuanceMessage) -> Self {
        self.inbox.push_back(message);
        self
    }
}

#[async_trait]
impl CounterpartySession for ScriptedSession {
    fn counterparty(&self) -> &str {
        &self.counterparty
    }

    async fn send(&mut self, message: &IssuanceMessage) -> Result<(), SessionError> {
        self.sent.lock().push(message.clone());
        if let Some(reply) = (self.script)(message) {
            self.inbox.push_back(reply);
        }
        Ok(())
    }

    async fn receive(&mut self, timeout: Duration) -> Result<IssuanceMessage, SessionError> {
        match self.inbox.pop_front() {
            Some(message) => Ok(message),
            None => {
                // Counterparty went quiet
                tokio::time::sleep(timeout).await;
                Err(SessionError::Timeout {
                    party: self.counterparty.clone(),
                    secs: timeout.as_secs(),
                })
            }
        }
    }
}

/// Messaging whose sessions all follow one script.
pub struct MockMessaging {
    script: Script,
    pub initiated: AtomicUsize,
    pub sent: Arc<Mutex<Vec<IssuanceMessage>>>,
}

impl MockMessaging {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            initiated: AtomicUsize::new(0),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn initiated(&self) -> usize {
        self.initiated.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FlowMessaging for MockMessaging {
    type Session = ScriptedSession;

    async fn initiate(&self, counterparty: &Party) -> Result<ScriptedSession, SessionError> {
        self.initiated.fetch_add(1, Ordering::SeqCst);
        let mut session = ScriptedSession::new(&counterparty.name, self.script.clone());
        session.sent = self.sent.clone();
        Ok(session)
    }
}

/// Counterparty that signs every request with `keypair`.
pub fn signing_script(keypair: Arc<Ed25519KeyPair>) -> Script {
    Arc::new(move |message| match message {
        IssuanceMessage::SignatureRequest(stx) => {
            let id = stx.id();
            Some(IssuanceMessage::SignatureResponse(TransactionSignature::new(
                keypair.public_key().to_bytes(),
                keypair.sign(id.as_bytes()).to_bytes(),
            )))
        }
        _ => None,
    })
}

/// Counterparty that refuses every request.
pub fn refusing_script(reason: &'static str) -> Script {
    Arc::new(move |message| match message {
        IssuanceMessage::SignatureRequest(_) => Some(IssuanceMessage::Rejected {
            reason: reason.to_string(),
        }),
        _ => None,
    })
}

/// Counterparty that never answers.
pub fn silent_script() -> Script {
    Arc::new(|_| None)
}

/// Notary gateway that signs everything, or fails with a fixed error.
pub struct MockNotary {
    keypair: Ed25519KeyPair,
    pub identity: Party,
    failure: Option<NotaryGatewayError>,
    pub submissions: AtomicUsize,
}

impl MockNotary {
    pub fn new() -> Self {
        let keypair = Ed25519KeyPair::from_seed([0x99u8; 32]);
        let identity = Party::new("Notary", keypair.public_key().to_bytes());
        Self {
            keypair,
            identity,
            failure: None,
            submissions: AtomicUsize::new(0),
        }
    }

    pub fn failing(failure: NotaryGatewayError) -> Self {
        Self {
            failure: Some(failure),
            ..Self::new()
        }
    }

    pub fn finalize(&self, stx: SignedTransaction) -> FinalizedTransaction {
        let id = stx.id();
        FinalizedTransaction {
            stx,
            notary_signature: TransactionSignature::new(
                self.identity.owning_key,
                self.keypair.sign(id.as_bytes()).to_bytes(),
            ),
        }
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotaryGateway for MockNotary {
    async fn notarise(
        &self,
        stx: SignedTransaction,
    ) -> Result<FinalizedTransaction, NotaryGatewayError> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(self.finalize(stx)),
        }
    }
}

pub fn keypair(seed: u8) -> Ed25519KeyPair {
    Ed25519KeyPair::from_seed([seed; 32])
}

pub fn party(name: &str, keypair: &Ed25519KeyPair) -> Party {
    Party::new(name, keypair.public_key().to_bytes())
}
