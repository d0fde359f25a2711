//! Input consumption registry.
//!
//! Records which transaction consumed each state. A commit is all-or-nothing:
//! either every input is free (or already consumed by the same transaction)
//! and all are marked, or nothing changes and the conflicts are returned.

use iou_01_contract::StateRef;
use shared_types::SecureHash;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct UniquenessRegistry {
    consumed: HashMap<StateRef, SecureHash>,
}

impl UniquenessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `inputs` consumed by `tx_id`.
    ///
    /// Returns each conflicting input with the transaction that consumed it.
    pub fn commit(
        &mut self,
        tx_id: SecureHash,
        inputs: &[StateRef],
    ) -> Result<(), Vec<(StateRef, SecureHash)>> {
        let conflicts: Vec<(StateRef, SecureHash)> = inputs
            .iter()
            .filter_map(|input| match self.consumed.get(input) {
                Some(consumer) if *consumer != tx_id => Some((*input, *consumer)),
                _ => None,
            })
            .collect();

        if !conflicts.is_empty() {
            return Err(conflicts);
        }

        for input in inputs {
            self.consumed.insert(*input, tx_id);
        }
        Ok(())
    }

    /// Transaction that consumed `state`, if any.
    pub fn consumer_of(&self, state: &StateRef) -> Option<SecureHash> {
        self.consumed.get(state).copied()
    }

    pub fn len(&self) -> usize {
        self.consumed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }
}
