//! In-memory adapters for the outbound ports.

pub mod bus_messaging;
pub mod key_manager;
pub mod ledger;
pub mod network_map;

pub use bus_messaging::{BusMessaging, BusSession};
pub use key_manager::LocalKeyManager;
pub use ledger::InMemoryLedger;
pub use network_map::InMemoryNetworkMap;
