//! # Shared Types Crate
//!
//! Identity, hashing and messaging types shared by every ledger subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Types that cross a party boundary live here.
//! - **Envelope Integrity**: Every frame exchanged in a session travels inside a
//!   `SessionEnvelope`; the envelope's `sender` is authoritative.
//! - **Opaque Identity**: A `Party` is compared by name and owning key only.

pub mod entities;
pub mod envelope;
pub mod errors;

pub use entities::*;
pub use envelope::{unix_now, SessionEnvelope};
pub use errors::*;
