//! Driving Ports (API - Inbound)

use crate::error::{IssuanceResult, ResponderResult};
use crate::ports::outbound::CounterpartySession;
use async_trait::async_trait;
use iou_01_contract::{FinalizedTransaction, ObligationRecord};

/// Initiating side of an issuance.
#[async_trait]
pub trait IssuanceApi: Send + Sync {
    /// Issue `record` onto the ledger.
    ///
    /// Either returns the finalized, recorded transaction or fails with no
    /// durable effect.
    async fn issue(&self, record: ObligationRecord) -> IssuanceResult<FinalizedTransaction>;
}

/// Counterparty side of an issuance.
#[async_trait]
pub trait ResponderApi<S: CounterpartySession>: Send + Sync {
    /// Handle one incoming issuance session to completion.
    async fn respond(&self, session: S) -> ResponderResult<()>;
}
