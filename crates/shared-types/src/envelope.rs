//! # `SessionEnvelope`
//!
//! The wrapper for every frame exchanged inside a point-to-point session.
//!
//! ## Properties
//!
//! - **Versioning**: All frames include a `version` field for forward compatibility.
//! - **Ordering**: Each direction of a session numbers its frames from zero;
//!   receivers reject gaps and reordering.
//! - **Freshness**: Receivers only accept frames stamped within
//!   `now - MAX_AGE ..= now + MAX_FUTURE_SKEW`.
//! - **Isolation**: `session_id` ties a frame to exactly one session.
//! - **Envelope Authority**: The `sender` is the sole source of truth for who
//!   produced the payload. Payloads MUST NOT duplicate it.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Frame envelope for session traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEnvelope {
    // =========================================================================
    // HEADER SECTION
    // =========================================================================
    /// Protocol version. MUST be checked before the payload is decoded.
    pub version: u16,

    /// Session this frame belongs to.
    pub session_id: Uuid,

    /// Legal name of the sending party.
    pub sender: String,

    /// Legal name of the receiving party.
    pub recipient: String,

    /// Position of this frame within its direction of the session.
    pub sequence: u64,

    /// Unix timestamp (seconds) when the frame was created.
    /// Valid window: `now - 120s <= timestamp <= now + 10s`.
    pub timestamp: u64,

    // =========================================================================
    // PAYLOAD SECTION
    // =========================================================================
    /// Encoded message body.
    pub payload: Vec<u8>,
}

impl SessionEnvelope {
    /// Current protocol version.
    pub const CURRENT_VERSION: u16 = 1;

    /// Maximum allowed clock skew for future timestamps (seconds).
    pub const MAX_FUTURE_SKEW: u64 = 10;

    /// Maximum age of an accepted frame (seconds).
    pub const MAX_AGE: u64 = 120;

    /// Build a frame stamped with the current version and time.
    pub fn new(
        session_id: Uuid,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        sequence: u64,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            session_id,
            sender: sender.into(),
            recipient: recipient.into(),
            sequence,
            timestamp: unix_now(),
            payload,
        }
    }

    /// Returns true if this frame speaks the current protocol version.
    #[must_use]
    pub fn is_supported_version(&self) -> bool {
        self.version == Self::CURRENT_VERSION
    }

    /// Returns true if the frame was stamped within the valid window around `now`.
    #[must_use]
    pub fn is_timestamp_valid(&self, now: u64) -> bool {
        self.timestamp >= now.saturating_sub(Self::MAX_AGE)
            && self.timestamp <= now.saturating_add(Self::MAX_FUTURE_SKEW)
    }
}

/// Current Unix time in seconds.
#[must_use]
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_envelope_is_current_version() {
        let env = SessionEnvelope::new(Uuid::new_v4(), "Alice", "Bob", 0, vec![1, 2, 3]);
        assert!(env.is_supported_version());
        assert_eq!(env.sender, "Alice");
        assert_eq!(env.recipient, "Bob");
        assert!(env.timestamp > 0);
    }

    #[test]
    fn test_old_version_is_unsupported() {
        let mut env = SessionEnvelope::new(Uuid::new_v4(), "Alice", "Bob", 0, Vec::new());
        env.version = 0;
        assert!(!env.is_supported_version());
    }

    #[test]
    fn test_timestamp_window() {
        let mut env = SessionEnvelope::new(Uuid::new_v4(), "Alice", "Bob", 0, Vec::new());
        let now = 1_000_000;

        env.timestamp = now;
        assert!(env.is_timestamp_valid(now));
        env.timestamp = now - SessionEnvelope::MAX_AGE;
        assert!(env.is_timestamp_valid(now));
        env.timestamp = now - SessionEnvelope::MAX_AGE - 1;
        assert!(!env.is_timestamp_valid(now));
        env.timestamp = now + SessionEnvelope::MAX_FUTURE_SKEW + 1;
        assert!(!env.is_timestamp_valid(now));
    }
}
