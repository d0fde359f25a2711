//! Ports layer for the issuance protocol

pub mod inbound;
pub mod outbound;

pub use inbound::{IssuanceApi, ResponderApi};
pub use outbound::{
    CounterpartySession, FlowMessaging, IdentityService, KeyManagement, LedgerStore,
    NotaryGateway, NotaryGatewayError,
};
