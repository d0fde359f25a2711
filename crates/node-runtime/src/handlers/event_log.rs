//! # Event Log Handler
//!
//! Subscribes to the ledger event bus and logs every event with the
//! standard transaction and party fields.

use ledger_telemetry::{log_event, log_tx_event};
use shared_bus::{LedgerEvent, Subscription};

pub struct EventLogHandler {
    subscription: Subscription,
}

impl EventLogHandler {
    pub fn new(subscription: Subscription) -> Self {
        Self { subscription }
    }

    /// Run until the bus is dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.subscription.recv().await {
            Self::log(&event);
        }
        log_event!(debug, "events", "Event bus closed");
    }

    fn log(event: &LedgerEvent) {
        match event {
            LedgerEvent::IssuanceProgress {
                flow_id,
                party,
                state,
            } => {
                log_event!(debug, "events", "Issuance progress", flow_id = %flow_id, party = %party, state = %state)
            }
            LedgerEvent::IssuanceFailed {
                flow_id,
                party,
                kind,
                reason,
            } => {
                log_event!(warn, "events", "Issuance failed", flow_id = %flow_id, party = %party, kind = %kind, reason = %reason)
            }
            LedgerEvent::SignatureProvided { tx_id, party } => {
                log_tx_event!(info, "events", "Signature provided", tx_id.short(), party = %party)
            }
            LedgerEvent::SignatureRefused {
                tx_id,
                party,
                reason,
            } => {
                log_tx_event!(warn, "events", "Signature refused", tx_id.short(), party = %party, reason = %reason)
            }
            LedgerEvent::TransactionNotarised { tx_id, notary } => {
                log_tx_event!(info, "events", "Transaction notarised", tx_id.short(), notary = %notary)
            }
            LedgerEvent::TransactionRecorded { tx_id, party } => {
                log_tx_event!(info, "events", "Transaction recorded", tx_id.short(), party = %party)
            }
        }
    }
}
