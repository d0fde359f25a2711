//! # Core Entities
//!
//! Identity and hashing primitives used across the ledger.
//!
//! ## Clusters
//!
//! - **Hashing**: `Hash`, `SecureHash`
//! - **Keys**: `PublicKey`, `Signature`
//! - **Identity**: `Party`

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte digest (BLAKE3).
pub type Hash = [u8; 32];

/// A 64-byte Ed25519 signature.
pub type Signature = [u8; 64];

/// A 32-byte Ed25519 public key.
pub type PublicKey = [u8; 32];

/// Content-derived identifier of a transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct SecureHash(pub Hash);

impl SecureHash {
    /// Wrap raw digest bytes.
    #[must_use]
    pub const fn new(bytes: Hash) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &Hash {
        &self.0
    }

    /// Full lowercase hex encoding.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First 8 bytes as hex, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl fmt::Display for SecureHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for SecureHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecureHash({})", self.short())
    }
}

/// A well-known network identity: a legal name bound to an owning key.
///
/// Two parties are the same identity only when both name and key match.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Party {
    /// Legal name, unique on the network map.
    pub name: String,
    /// Key whose signatures this party contributes.
    pub owning_key: PublicKey,
}

impl Party {
    /// Create a party from a name and owning key.
    pub fn new(name: impl Into<String>, owning_key: PublicKey) -> Self {
        Self {
            name: name.into(),
            owning_key,
        }
    }

    /// Hex of the owning key, shortened for logs.
    #[must_use]
    pub fn key_fingerprint(&self) -> String {
        key_fingerprint(&self.owning_key)
    }
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl fmt::Debug for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Party({}, {})", self.name, self.key_fingerprint())
    }
}

/// Short hex fingerprint of a public key.
#[must_use]
pub fn key_fingerprint(key: &PublicKey) -> String {
    hex::encode(&key[..6])
}
