//! # Handlers
//!
//! Long-running loops spawned by the runtime.
//!
//! - `SessionHandler`: accepts issuance sessions for one party and runs its
//!   responder on each
//! - `EventLogHandler`: writes ledger events to the log

pub mod event_log;
pub mod sessions;

pub use event_log::EventLogHandler;
pub use sessions::SessionHandler;
