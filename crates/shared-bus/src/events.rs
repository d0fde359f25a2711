//! # Ledger Events
//!
//! Defines all event types that flow through the event bus.

use serde::{Deserialize, Serialize};
use shared_types::SecureHash;
use uuid::Uuid;

/// All events that can be published to the event bus.
///
/// Every event names the party that emitted it so observers of a multi-party
/// deployment can follow one side of the protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    // =========================================================================
    // ISSUANCE (coordinator side)
    // =========================================================================
    /// The issuance state machine entered a new state.
    IssuanceProgress {
        flow_id: Uuid,
        party: String,
        state: String,
    },

    /// An issuance attempt was abandoned.
    IssuanceFailed {
        flow_id: Uuid,
        party: String,
        kind: String,
        reason: String,
    },

    // =========================================================================
    // SIGNING (responder side)
    // =========================================================================
    /// A counterparty contributed its signature.
    SignatureProvided { tx_id: SecureHash, party: String },

    /// A counterparty refused to sign.
    SignatureRefused {
        tx_id: SecureHash,
        party: String,
        reason: String,
    },

    // =========================================================================
    // NOTARY
    // =========================================================================
    /// The notary sequenced and signed a transaction.
    TransactionNotarised { tx_id: SecureHash, notary: String },

    // =========================================================================
    // LEDGER
    // =========================================================================
    /// A finalized transaction was written to a party's ledger.
    TransactionRecorded { tx_id: SecureHash, party: String },
}

impl LedgerEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::IssuanceProgress { .. } | Self::IssuanceFailed { .. } => EventTopic::Issuance,
            Self::SignatureProvided { .. } | Self::SignatureRefused { .. } => EventTopic::Signing,
            Self::TransactionNotarised { .. } => EventTopic::Notary,
            Self::TransactionRecorded { .. } => EventTopic::Ledger,
        }
    }

    /// Name of the party (or notary) that emitted this event.
    #[must_use]
    pub fn party(&self) -> &str {
        match self {
            Self::IssuanceProgress { party, .. }
            | Self::IssuanceFailed { party, .. }
            | Self::SignatureProvided { party, .. }
            | Self::SignatureRefused { party, .. }
            | Self::TransactionRecorded { party, .. } => party,
            Self::TransactionNotarised { notary, .. } => notary,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Coordinator progress and failures.
    Issuance,
    /// Responder signing decisions.
    Signing,
    /// Notarisation results.
    Notary,
    /// Ledger writes.
    Ledger,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Emitting parties to include. Empty means all parties.
    pub parties: Vec<String>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            parties: Vec::new(),
        }
    }

    /// Create a filter for events emitted by specific parties.
    #[must_use]
    pub fn from_parties(parties: Vec<String>) -> Self {
        Self {
            topics: Vec::new(),
            parties,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let party_match =
            self.parties.is_empty() || self.parties.iter().any(|p| p == event.party());

        topic_match && party_match
    }
}
