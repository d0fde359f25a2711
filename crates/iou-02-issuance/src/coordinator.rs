//! Issuance Coordinator - the initiating side of the protocol
//!
//! ```text
//! build ──→ verify ──→ sign ──→ open session(borrower) ──→ collect signature
//!                                                               │
//!          return ←── record + send Finalized ←── notarise ←────┘
//! ```
//!
//! Local validation always runs before any network interaction, and
//! signature collection always completes before notarisation.

use crate::config::IssuanceConfig;
use crate::domain::{IssuanceEvent, IssuanceState, IssuanceStateMachine};
use crate::error::{IssuanceError, IssuanceResult};
use crate::messages::IssuanceMessage;
use crate::metrics;
use crate::ports::inbound::IssuanceApi;
use crate::ports::outbound::{
    CounterpartySession, FlowMessaging, IdentityService, KeyManagement, LedgerStore,
    NotaryGateway, NotaryGatewayError,
};
use async_trait::async_trait;
use iou_01_contract::{
    Command, ContractState, FinalizedTransaction, IouContract, ObligationRecord,
    SignedTransaction, TransactionBuilder,
};
use shared_bus::{EventPublisher, LedgerEvent};
use shared_types::{Party, SessionError};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Drives issuances for the lender.
pub struct IssuanceCoordinator<I, K, M, N, L>
where
    I: IdentityService,
    K: KeyManagement,
    M: FlowMessaging,
    N: NotaryGateway,
    L: LedgerStore,
{
    config: IssuanceConfig,
    identity: Arc<I>,
    keys: Arc<K>,
    messaging: Arc<M>,
    notary: Arc<N>,
    ledger: Arc<L>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl<I, K, M, N, L> IssuanceCoordinator<I, K, M, N, L>
where
    I: IdentityService,
    K: KeyManagement,
    M: FlowMessaging,
    N: NotaryGateway,
    L: LedgerStore,
{
    pub fn new(
        config: IssuanceConfig,
        identity: Arc<I>,
        keys: Arc<K>,
        messaging: Arc<M>,
        notary: Arc<N>,
        ledger: Arc<L>,
    ) -> Self {
        Self {
            config,
            identity,
            keys,
            messaging,
            notary,
            ledger,
            events: None,
        }
    }

    /// Publish progress and outcome events to `events`.
    #[must_use]
    pub fn with_event_publisher(mut self, events: Arc<dyn EventPublisher>) -> Self {
        self.events = Some(events);
        self
    }

    /// Ask `counterparty` to sign `stx` over an open session.
    ///
    /// Only a signature by the counterparty's owning key over this exact
    /// transaction id is accepted.
    pub async fn collect_signatures<S: CounterpartySession>(
        &self,
        session: &mut S,
        stx: SignedTransaction,
        counterparty: &Party,
    ) -> IssuanceResult<SignedTransaction> {
        let tx_id = stx.id();
        session
            .send(&IssuanceMessage::SignatureRequest(stx.clone()))
            .await?;
        debug!(tx_id = %tx_id.short(), counterparty = %counterparty.name, "Signature requested");

        let invalid = |reason: String| IssuanceError::InvalidCounterpartySignature {
            party: counterparty.name.clone(),
            reason,
        };

        match session.receive(self.config.counterparty_timeout()).await? {
            IssuanceMessage::SignatureResponse(sig) => {
                if sig.by != counterparty.owning_key {
                    return Err(invalid(format!(
                        "signed with key {} instead of {}",
                        shared_types::key_fingerprint(&sig.by),
                        counterparty.key_fingerprint()
                    )));
                }
                sig.verify(&tx_id).map_err(|e| invalid(e.to_string()))?;

                let stx = stx.with_signature(sig);
                stx.verify_required_signatures()
                    .map_err(|e| invalid(e.to_string()))?;
                Ok(stx)
            }
            IssuanceMessage::Rejected { reason } => Err(IssuanceError::CounterpartyRejection {
                party: counterparty.name.clone(),
                reason,
            }),
            other => Err(SessionError::UnexpectedMessage(format!(
                "expected SignatureResponse, got {}",
                other.name()
            ))
            .into()),
        }
    }

    async fn run(
        &self,
        machine: &mut IssuanceStateMachine,
        us: &Party,
        record: ObligationRecord,
    ) -> IssuanceResult<FinalizedTransaction> {
        if record.lender != *us {
            return Err(IssuanceError::NotLender {
                lender: record.lender.name.clone(),
                initiator: us.name.clone(),
            });
        }

        let notary = self
            .identity
            .notary_identities()
            .into_iter()
            .next()
            .ok_or(IssuanceError::NoNotaryAvailable)?;

        let borrower = record.borrower.clone();
        let signers = record.participant_keys();
        let tx = TransactionBuilder::new(notary)
            .with_output(ContractState::Obligation(record))
            .with_command(Command::issue(signers))
            .to_wire_transaction();

        IouContract::verify(&tx)?;

        let tx_id = tx.id();
        let stx = SignedTransaction::new(tx, self.keys.sign(&tx_id));
        self.advance(machine, us, IssuanceEvent::SignedLocally).await?;

        match self.identity.well_known_party(&borrower.name) {
            Some(known) if known == borrower => {}
            _ => {
                return Err(IssuanceError::UnknownCounterparty {
                    name: borrower.name.clone(),
                })
            }
        }

        let mut session = self.messaging.initiate(&borrower).await?;
        self.advance(machine, us, IssuanceEvent::SignatureRequested)
            .await?;
        let stx = self.collect_signatures(&mut session, stx, &borrower).await?;
        self.advance(machine, us, IssuanceEvent::CounterpartySigned)
            .await?;

        self.advance(machine, us, IssuanceEvent::SubmittedToNotary)
            .await?;
        let finalized = match self.notarise(stx).await {
            Ok(finalized) => finalized,
            Err(err) => {
                let abort = IssuanceMessage::Aborted {
                    reason: err.to_string(),
                };
                if let Err(e) = session.send(&abort).await {
                    debug!(tx_id = %tx_id.short(), error = %e, "Counterparty not told of abort");
                }
                return Err(err);
            }
        };

        if self.ledger.record(finalized.clone()) {
            self.publish(LedgerEvent::TransactionRecorded {
                tx_id,
                party: us.name.clone(),
            })
            .await;
        }
        self.advance(machine, us, IssuanceEvent::Notarised).await?;

        // Notarised is final: a counterparty that misses this can still be
        // sent the transaction later.
        if let Err(e) = session
            .send(&IssuanceMessage::Finalized(finalized.clone()))
            .await
        {
            warn!(
                tx_id = %tx_id.short(),
                counterparty = %borrower.name,
                error = %e,
                "Counterparty did not receive finalized transaction"
            );
        }

        Ok(finalized)
    }

    async fn notarise(&self, stx: SignedTransaction) -> IssuanceResult<FinalizedTransaction> {
        let tx_id = stx.id();
        let limit = self.config.finality_timeout();

        let finalized = match tokio::time::timeout(limit, self.notary.notarise(stx)).await {
            Err(_) => {
                return Err(IssuanceError::NotaryTimeout {
                    secs: limit.as_secs(),
                })
            }
            Ok(Err(NotaryGatewayError::Conflict { conflicts })) => {
                return Err(IssuanceError::NotarizationConflict { tx_id, conflicts })
            }
            Ok(Err(NotaryGatewayError::Rejected { reason })) => {
                return Err(IssuanceError::NotaryRejected { reason })
            }
            Ok(Ok(finalized)) => finalized,
        };

        if finalized.id() != tx_id {
            return Err(IssuanceError::NotaryRejected {
                reason: format!("notary finalized {} instead of {}", finalized.id(), tx_id),
            });
        }
        finalized
            .verify()
            .map_err(|e| IssuanceError::NotaryRejected {
                reason: e.to_string(),
            })?;
        Ok(finalized)
    }

    async fn advance(
        &self,
        machine: &mut IssuanceStateMachine,
        us: &Party,
        event: IssuanceEvent,
    ) -> IssuanceResult<()> {
        let state = machine.process_event(event)?;
        debug!(flow_id = %machine.flow_id(), party = %us.name, state = %state, "Issuance progressed");
        self.publish_progress(machine.flow_id(), us, state).await;
        Ok(())
    }

    async fn publish_progress(&self, flow_id: Uuid, us: &Party, state: IssuanceState) {
        if self.config.publish_progress {
            self.publish(LedgerEvent::IssuanceProgress {
                flow_id,
                party: us.name.clone(),
                state: state.to_string(),
            })
            .await;
        }
    }

    async fn publish(&self, event: LedgerEvent) {
        if let Some(events) = &self.events {
            events.publish(event).await;
        }
    }
}

#[async_trait]
impl<I, K, M, N, L> IssuanceApi for IssuanceCoordinator<I, K, M, N, L>
where
    I: IdentityService,
    K: KeyManagement,
    M: FlowMessaging,
    N: NotaryGateway,
    L: LedgerStore,
{
    async fn issue(&self, record: ObligationRecord) -> IssuanceResult<FinalizedTransaction> {
        let mut machine = IssuanceStateMachine::new();
        let flow_id = machine.flow_id();
        let us = self.keys.our_identity();

        metrics::record_issuance_started();
        info!(
            flow_id = %flow_id,
            party = %us.name,
            amount = %record.amount,
            borrower = %record.borrower.name,
            "Issuance started"
        );

        match self.run(&mut machine, &us, record).await {
            Ok(finalized) => {
                metrics::record_issuance_finalized();
                info!(
                    flow_id = %flow_id,
                    party = %us.name,
                    tx_id = %finalized.id().short(),
                    "Issuance finalized"
                );
                Ok(finalized)
            }
            Err(err) => {
                let kind = err.kind();
                if let Ok(state) = machine.process_event(IssuanceEvent::Failed(kind)) {
                    self.publish_progress(flow_id, &us, state).await;
                }
                metrics::record_issuance_failed(kind.as_str());
                warn!(flow_id = %flow_id, party = %us.name, kind = %kind, error = %err, "Issuance failed");
                self.publish(LedgerEvent::IssuanceFailed {
                    flow_id,
                    party: us.name.clone(),
                    kind: kind.to_string(),
                    reason: err.to_string(),
                })
                .await;
                Err(err)
            }
        }
    }
}
