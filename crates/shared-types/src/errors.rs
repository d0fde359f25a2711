//! # Error Types
//!
//! Defines error types used across subsystems.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by point-to-point session messaging.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No party with this name is known to the router or network map.
    #[error("Unknown party: {0}")]
    UnknownParty(String),

    /// The party is known but no longer accepts sessions.
    #[error("Party unreachable: {0}")]
    PartyUnreachable(String),

    /// The other half of the session was dropped.
    #[error("Session {session_id} closed by counterparty")]
    Closed { session_id: Uuid },

    /// No reply arrived within the configured bound.
    #[error("Timed out after {secs}s waiting for {party}")]
    Timeout { party: String, secs: u64 },

    /// A frame arrived with an unexpected sequence number.
    #[error("Out-of-order frame: expected sequence {expected}, got {actual}")]
    OutOfOrder { expected: u64, actual: u64 },

    /// Frame version not supported.
    #[error("Unsupported version: received {received}, supported {supported}")]
    UnsupportedVersion { received: u16, supported: u16 },

    /// Frame timestamp outside the accepted window.
    #[error("Timestamp out of range: {timestamp} not within valid window of {now}")]
    TimestampOutOfRange { timestamp: u64, now: u64 },

    /// A frame belonging to another session was delivered here.
    #[error("Frame for session {actual} delivered to session {expected}")]
    SessionMismatch { expected: Uuid, actual: Uuid },

    /// Payload could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(String),

    /// The counterparty sent a message that is not valid at this point of the protocol.
    #[error("Unexpected message: {0}")]
    UnexpectedMessage(String),
}
