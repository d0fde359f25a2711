//! Domain layer for the notary

pub mod uniqueness;

pub use uniqueness::UniquenessRegistry;
