//! # Shared Bus - Ledger Events and Party Sessions
//!
//! Two messaging shapes live here:
//!
//! - **Event bus** (`publisher`, `subscriber`): broadcast of `LedgerEvent`s to any
//!   number of local observers (progress tracking, audit, tests).
//! - **Session router** (`session`): ordered point-to-point sessions between
//!   exactly two named parties, isolated from every other session.
//!
//! ```text
//! ┌──────────────┐   open(Alice, Bob)   ┌──────────────┐
//! │    Alice     │ ───────────────────→ │ SessionRouter│
//! │  (initiator) │                      └──────┬───────┘
//! │              │ ←─── Session ───────────────┤ inbox(Bob)
//! └──────┬───────┘                             ↓
//!        │          SessionEnvelope      ┌──────────────┐
//!        └─────────────────────────────→ │     Bob      │
//!                   (seq 0, 1, ...)      │  (responder) │
//!                                        └──────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - Frames within one direction of a session are delivered in send order
//! - A session only ever carries traffic between its two parties
//! - Event publishing never blocks; events with no subscribers are dropped

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod session;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, LedgerEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use session::{Session, SessionInbox, SessionRouter};
pub use subscriber::{EventSubscriber, Subscription, SubscriptionError};

/// Maximum events to buffer per subscriber before lagging.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;

/// Maximum frames buffered per session direction.
pub const SESSION_CHANNEL_CAPACITY: usize = 64;

/// Maximum pending (not yet accepted) sessions per party inbox.
pub const INBOX_CAPACITY: usize = 128;
