//! Issuance state machine
//!
//! One issuance attempt moves through a fixed sequence of states. Each
//! transition is triggered by local computation or by a counterparty or
//! notary reply; anything else is an illegal transition.
//!
//! State Machine:
//! ```text
//! [BUILT] ──signed──→ [LOCALLY_SIGNED] ──requested──→ [AWAITING_COUNTERPARTY]
//!                                                             │
//!                                                  counterparty signed
//!                                                             ↓
//! [FINALIZED] ←──notarised── [SUBMITTED] ←──submitted── [FULLY_SIGNED]
//!
//! any non-terminal state ──failed(kind)──→ [FAILED(kind)]
//! ```

use crate::error::FailureKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Where an issuance attempt currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum IssuanceState {
    /// Transaction built, not yet validated and signed
    #[default]
    Built,
    /// Validated and signed by the initiator
    LocallySigned,
    /// Signature request sent, waiting for the counterparty
    AwaitingCounterparty,
    /// Signed by every required key
    FullySigned,
    /// Handed to the notary
    Submitted,
    /// Notarised and recorded
    Finalized,
    /// Abandoned
    Failed(FailureKind),
}

impl IssuanceState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Failed(_))
    }
}

impl fmt::Display for IssuanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Built => f.write_str("built"),
            Self::LocallySigned => f.write_str("locally_signed"),
            Self::AwaitingCounterparty => f.write_str("awaiting_counterparty"),
            Self::FullySigned => f.write_str("fully_signed"),
            Self::Submitted => f.write_str("submitted"),
            Self::Finalized => f.write_str("finalized"),
            Self::Failed(kind) => write!(f, "failed({kind})"),
        }
    }
}

/// Events that drive the issuance state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssuanceEvent {
    /// Local validation passed and our signature was attached
    SignedLocally,
    /// Signature request sent to the counterparty
    SignatureRequested,
    /// Counterparty signature received and checked
    CounterpartySigned,
    /// Fully signed transaction handed to the notary
    SubmittedToNotary,
    /// Notary returned a finalized transaction
    Notarised,
    /// The attempt failed
    Failed(FailureKind),
}

/// An event arrived that the current state does not accept.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Illegal issuance transition: {event:?} in state {from}")]
pub struct IllegalTransition {
    pub from: IssuanceState,
    pub event: IssuanceEvent,
}

/// State machine for one issuance attempt.
#[derive(Debug)]
pub struct IssuanceStateMachine {
    flow_id: Uuid,
    state: IssuanceState,
    history: Vec<IssuanceState>,
}

impl IssuanceStateMachine {
    pub fn new() -> Self {
        Self::with_flow_id(Uuid::new_v4())
    }

    pub fn with_flow_id(flow_id: Uuid) -> Self {
        Self {
            flow_id,
            state: IssuanceState::Built,
            history: vec![IssuanceState::Built],
        }
    }

    pub fn flow_id(&self) -> Uuid {
        self.flow_id
    }

    pub fn state(&self) -> IssuanceState {
        self.state
    }

    /// Every state visited, starting with `Built`.
    pub fn history(&self) -> &[IssuanceState] {
        &self.history
    }

    /// Apply an event, returning the new state.
    pub fn process_event(
        &mut self,
        event: IssuanceEvent,
    ) -> Result<IssuanceState, IllegalTransition> {
        let next = Self::next_state(self.state, event).ok_or(IllegalTransition {
            from: self.state,
            event,
        })?;
        self.state = next;
        self.history.push(next);
        Ok(next)
    }

    fn next_state(state: IssuanceState, event: IssuanceEvent) -> Option<IssuanceState> {
        use IssuanceEvent as E;
        use IssuanceState as S;

        match (state, event) {
            (S::Built, E::SignedLocally) => Some(S::LocallySigned),
            (S::LocallySigned, E::SignatureRequested) => Some(S::AwaitingCounterparty),
            (S::AwaitingCounterparty, E::CounterpartySigned) => Some(S::FullySigned),
            (S::FullySigned, E::SubmittedToNotary) => Some(S::Submitted),
            (S::Submitted, E::Notarised) => Some(S::Finalized),
            (s, E::Failed(kind)) if !s.is_terminal() => Some(S::Failed(kind)),
            _ => None,
        }
    }
}

impl Default for IssuanceStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
