//! # IOU Ledger Test Suite
//!
//! Unified test crate for scenarios that span several crates.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── e2e_issuance.rs      # Coordinator ↔ responder over the session router
//!     └── notary_conflicts.rs  # Concurrent double spends against one notary
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p iou-tests
//!
//! # Benchmarks
//! cargo bench -p iou-tests
//! ```

pub mod integration;
