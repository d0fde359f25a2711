//! Ports layer for the notary

pub mod inbound;

pub use inbound::NotaryApi;
