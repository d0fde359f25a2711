//! # Adapter Implementations
//!
//! Concrete implementations of the issuance protocol's **outbound ports**
//! that the issuance crate does not provide itself.
//!
//! ```text
//! IssuanceCoordinator ──NotaryGateway──→ NotaryAdapter ──NotaryApi──→ NotaryService
//! ```

pub mod notary;

pub use notary::NotaryAdapter;
