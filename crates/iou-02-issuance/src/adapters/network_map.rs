//! Network map adapter

use crate::ports::outbound::IdentityService;
use parking_lot::RwLock;
use shared_types::Party;
use std::collections::HashMap;

/// Network map held in memory.
#[derive(Default)]
pub struct InMemoryNetworkMap {
    parties: RwLock<HashMap<String, Party>>,
    notaries: RwLock<Vec<Party>>,
}

impl InMemoryNetworkMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a party. A later registration under the same name replaces it.
    pub fn register_party(&self, party: Party) {
        self.parties.write().insert(party.name.clone(), party);
    }

    /// Publish a notary. Notaries are also resolvable as parties.
    pub fn register_notary(&self, notary: Party) {
        self.register_party(notary.clone());
        let mut notaries = self.notaries.write();
        if !notaries.contains(&notary) {
            notaries.push(notary);
        }
    }
}

impl IdentityService for InMemoryNetworkMap {
    fn notary_identities(&self) -> Vec<Party> {
        self.notaries.read().clone()
    }

    fn well_known_party(&self, name: &str) -> Option<Party> {
        self.parties.read().get(name).cloned()
    }
}
