//! # Integration Tests
//!
//! End-to-end issuance between hosted parties, and notary uniqueness under
//! concurrent submission.

pub mod e2e_issuance;
pub mod notary_conflicts;
