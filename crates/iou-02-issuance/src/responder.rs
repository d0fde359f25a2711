//! Issuance Responder - the borrower's side of the protocol
//!
//! Signs only what it has checked:
//! 1. every attached signature verifies and only ours is missing
//! 2. the initiating party actually signed
//! 3. our key is one the transaction requires
//! 4. the transaction has exactly one output and it is an obligation
//!
//! After signing it waits for the finalized transaction and records it.

use crate::config::IssuanceConfig;
use crate::error::{ResponderError, ResponderResult};
use crate::messages::IssuanceMessage;
use crate::metrics;
use crate::ports::inbound::ResponderApi;
use crate::ports::outbound::{CounterpartySession, IdentityService, KeyManagement, LedgerStore};
use async_trait::async_trait;
use iou_01_contract::{IouContract, SignedTransaction};
use shared_bus::{EventPublisher, LedgerEvent};
use shared_types::{Party, SessionError};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct IssuanceResponder<I, K, L>
where
    I: IdentityService,
    K: KeyManagement,
    L: LedgerStore,
{
    config: IssuanceConfig,
    identity: Arc<I>,
    keys: Arc<K>,
    ledger: Arc<L>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl<I, K, L> IssuanceResponder<I, K, L>
where
    I: IdentityService,
    K: KeyManagement,
    L: LedgerStore,
{
    pub fn new(config: IssuanceConfig, identity: Arc<I>, keys: Arc<K>, ledger: Arc<L>) -> Self {
        Self {
            config,
            identity,
            keys,
            ledger,
            events: None,
        }
    }

    #[must_use]
    pub fn with_event_publisher(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = Some(events);
        self
    }

    /// Decide whether to sign `stx` for `initiator`. Returns the refusal reason.
    fn check_transaction(
        &self,
        stx: &SignedTransaction,
        initiator: &str,
        us: &Party,
    ) -> Result<(), String> {
        let initiator = self
            .identity
            .well_known_party(initiator)
            .ok_or_else(|| format!("Unknown initiating party {initiator}"))?;

        stx.verify_signatures_except(&[us.owning_key])
            .map_err(|e| e.to_string())?;

        if !stx.signing_keys().contains(&initiator.owning_key) {
            return Err(format!("Transaction is not signed by {}", initiator.name));
        }
        if !stx.required_signing_keys().contains(&us.owning_key) {
            return Err(format!(
                "Transaction does not require a signature from {}",
                us.name
            ));
        }

        IouContract::single_obligation_output(&stx.tx).map_err(|e| e.to_string())?;
        Ok(())
    }

    async fn refuse<S: CounterpartySession>(
        &self,
        session: &mut S,
        stx: &SignedTransaction,
        us: &Party,
        reason: String,
    ) -> ResponderResult<()> {
        let tx_id = stx.id();
        warn!(
            tx_id = %tx_id.short(),
            party = %us.name,
            counterparty = %session.counterparty(),
            reason = %reason,
            "Refusing to sign"
        );
        metrics::record_responder_refusal();
        session
            .send(&IssuanceMessage::Rejected {
                reason: reason.clone(),
            })
            .await?;
        self.publish(LedgerEvent::SignatureRefused {
            tx_id,
            party: us.name.clone(),
            reason: reason.clone(),
        })
        .await;
        Err(ResponderError::Refused { reason })
    }

    async fn await_finality<S: CounterpartySession>(
        &self,
        session: &mut S,
        stx: &SignedTransaction,
        us: &Party,
    ) -> ResponderResult<()> {
        let tx_id = stx.id();
        let limit = self.config.counterparty_timeout() + self.config.finality_timeout();

        match session.receive(limit).await? {
            IssuanceMessage::Finalized(finalized) => {
                if finalized.id() != tx_id {
                    return Err(ResponderError::InvalidFinalTransaction {
                        reason: format!("expected {}, got {}", tx_id, finalized.id()),
                    });
                }
                finalized
                    .verify()
                    .map_err(|e| ResponderError::InvalidFinalTransaction {
                        reason: e.to_string(),
                    })?;

                if self.ledger.record(finalized) {
                    self.publish(LedgerEvent::TransactionRecorded {
                        tx_id,
                        party: us.name.clone(),
                    })
                    .await;
                }
                info!(tx_id = %tx_id.short(), party = %us.name, "Issuance recorded");
                Ok(())
            }
            IssuanceMessage::Aborted { reason } => {
                warn!(tx_id = %tx_id.short(), party = %us.name, reason = %reason, "Issuance abandoned by initiator");
                Err(ResponderError::Abandoned { reason })
            }
            other => Err(SessionError::UnexpectedMessage(format!(
                "expected Finalized, got {}",
                other.name()
            ))
            .into()),
        }
    }

    async fn publish(&self, event: LedgerEvent) {
        if let Some(events) = &self.events {
            events.publish(event).await;
        }
    }
}

#[async_trait]
impl<I, K, L, S> ResponderApi<S> for IssuanceResponder<I, K, L>
where
    I: IdentityService,
    K: KeyManagement,
    L: LedgerStore,
    S: CounterpartySession + 'static,
{
    async fn respond(&self, mut session: S) -> ResponderResult<()> {
        let us = self.keys.our_identity();

        let stx = match session.receive(self.config.counterparty_timeout()).await? {
            IssuanceMessage::SignatureRequest(stx) => stx,
            other => {
                return Err(SessionError::UnexpectedMessage(format!(
                    "expected SignatureRequest, got {}",
                    other.name()
                ))
                .into())
            }
        };
        let tx_id = stx.id();
        let initiator = session.counterparty().to_string();
        debug!(tx_id = %tx_id.short(), party = %us.name, counterparty = %initiator, "Signature requested");

        if let Err(reason) = self.check_transaction(&stx, &initiator, &us) {
            return self.refuse(&mut session, &stx, &us, reason).await;
        }

        let signature = self.keys.sign(&tx_id);
        session
            .send(&IssuanceMessage::SignatureResponse(signature))
            .await?;
        metrics::record_signature_provided();
        info!(tx_id = %tx_id.short(), party = %us.name, counterparty = %initiator, "Signature provided");
        self.publish(LedgerEvent::SignatureProvided {
            tx_id,
            party: us.name.clone(),
        })
        .await;

        self.await_finality(&mut session, &stx, &us).await
    }
}
