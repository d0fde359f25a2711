//! Key management adapter over a local Ed25519 key

use crate::ports::outbound::KeyManagement;
use iou_01_contract::TransactionSignature;
use shared_crypto::{blake3_derive_key, Ed25519KeyPair};
use shared_types::{Party, SecureHash};

const SEED_CONTEXT: &str = "iou-ledger 2024 party signing key seed";

/// Holds this node's identity key in memory.
pub struct LocalKeyManager {
    identity: Party,
    keypair: Ed25519KeyPair,
}

impl LocalKeyManager {
    pub fn new(name: impl Into<String>, keypair: Ed25519KeyPair) -> Self {
        let identity = Party::new(name, keypair.public_key().to_bytes());
        Self { identity, keypair }
    }

    /// Fresh random key.
    pub fn generate(name: impl Into<String>) -> Self {
        Self::new(name, Ed25519KeyPair::generate())
    }

    /// Key derived from the party name, stable across runs.
    pub fn deterministic(name: &str) -> Self {
        let seed = blake3_derive_key(SEED_CONTEXT, name.as_bytes());
        Self::new(name, Ed25519KeyPair::from_seed(seed))
    }
}

impl KeyManagement for LocalKeyManager {
    fn our_identity(&self) -> Party {
        self.identity.clone()
    }

    fn sign(&self, tx_id: &SecureHash) -> TransactionSignature {
        TransactionSignature::new(
            self.identity.owning_key,
            self.keypair.sign(tx_id.as_bytes()).to_bytes(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_verifies() {
        let keys = LocalKeyManager::generate("Alice");
        let id = SecureHash::new([3u8; 32]);

        let sig = keys.sign(&id);
        assert_eq!(sig.by, keys.our_identity().owning_key);
        assert!(sig.verify(&id).is_ok());
    }

    #[test]
    fn test_deterministic_keys() {
        let a = LocalKeyManager::deterministic("Alice");
        let b = LocalKeyManager::deterministic("Alice");
        let c = LocalKeyManager::deterministic("Bob");
        assert_eq!(a.our_identity(), b.our_identity());
        assert_ne!(a.our_identity().owning_key, c.our_identity().owning_key);
    }
}
