use std::fmt::{self, Display};
use std::io;
use thiserror::Error;

/// Broad category a [`DiscordIpcError`] falls into, used by callers that want
/// to branch on "is this a transport hiccup or did I do something wrong".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Connection,
    Protocol,
    Serialization,
    Application,
    Other,
}

impl Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection => write!(f, "connection"),
            Self::Protocol => write!(f, "protocol"),
            Self::Serialization => write!(f, "serialization"),
            Self::Application => write!(f, "application"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Extra detail attached to a protocol-level error, useful for logging.
#[derive(Debug, Clone, Default)]
pub struct ProtocolContext {
    pub expected_opcode: Option<u32>,
    pub received_opcode: Option<u32>,
    pub payload_size: Option<usize>,
}

/// Errors surfaced by the Discord IPC client.
///
/// User-invoked API validation errors (`BadPresence`, `InvalidConfiguration`,
/// `StringOutOfRange`, `Uninitialized`, `Disposed`) are raised synchronously
/// from the call that triggered them and never mutate client state.
/// Transport and protocol failures (`TransportError`, `ProtocolError`,
/// `ServerError`) are absorbed by the engine and instead surface as
/// [`crate::message::Message`] values delivered through `invoke`/event
/// callbacks.
#[derive(Error, Debug)]
pub enum DiscordIpcError {
    /// Failed to connect to a Discord IPC socket or pipe.
    #[error("failed to connect to Discord IPC socket: {0}")]
    ConnectionFailed(#[source] io::Error),

    /// A connection attempt with an explicit timeout ran out of time.
    #[error("connection to Discord timed out after {0} ms")]
    ConnectionTimeout(u64),

    /// No pipe in the scanned range accepted a connection.
    #[error("no Discord IPC socket found. Is Discord running?")]
    NoValidSocket,

    /// Failed to serialize an outbound JSON payload.
    #[error("failed to serialize JSON payload: {0}")]
    SerializationFailed(#[source] serde_json::Error),

    /// Failed to deserialize an inbound JSON payload.
    #[error("failed to deserialize response from Discord: {0}")]
    DeserializationFailed(#[source] serde_json::Error),

    /// Response shape didn't match what was expected for the request made.
    #[error("invalid response from Discord: {0}")]
    InvalidResponse(String),

    /// The initial handshake did not complete successfully.
    #[error("handshake failed: {0}")]
    HandshakeFailed(String),

    /// The pipe was closed while a read or write was in flight.
    #[error("socket connection was closed unexpectedly")]
    SocketClosed,

    /// A frame header referenced an opcode outside `0..=4`.
    #[error("invalid opcode: {0}")]
    InvalidOpcode(u32),

    /// A well-formed but invalid frame was received (oversized length,
    /// unparsable JSON body, handshake opcode echoed back, etc).
    #[error("protocol violation: {message}")]
    ProtocolViolation {
        message: String,
        context: ProtocolContext,
    },

    /// Discord's `{"code":..., "message":...}` error envelope.
    #[error("Discord error: {code} - {message}")]
    DiscordError { code: i32, message: String },

    /// An [`crate::activity::Activity`] failed field-length or
    /// party-size validation.
    #[error("invalid activity: {0}")]
    InvalidActivity(String),

    /// A string field exceeded its byte budget (see `activity` module
    /// constants for the limits).
    #[error("{field} exceeds the {limit}-byte limit ({actual} bytes)")]
    StringOutOfRange {
        field: &'static str,
        limit: usize,
        actual: usize,
    },

    /// A public API was called before `initialize()`.
    #[error("client has not been initialized")]
    Uninitialized,

    /// A public API was called after `dispose()`.
    #[error("client has been disposed")]
    Disposed,

    /// `initialize()` was called twice without an intervening `dispose()`.
    #[error("client is already initialized")]
    AlreadyInitialized,

    /// An operation (subscribe, secrets) requires the URI scheme to be
    /// registered and it is not.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The system clock is set before the UNIX epoch.
    #[error("system time is before UNIX epoch: {0}")]
    SystemTimeError(String),
}

impl DiscordIpcError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConnectionFailed(_)
            | Self::ConnectionTimeout(_)
            | Self::NoValidSocket
            | Self::SocketClosed => ErrorCategory::Connection,

            Self::SerializationFailed(_) | Self::DeserializationFailed(_) => {
                ErrorCategory::Serialization
            }

            Self::InvalidResponse(_)
            | Self::HandshakeFailed(_)
            | Self::InvalidOpcode(_)
            | Self::ProtocolViolation { .. } => ErrorCategory::Protocol,

            Self::DiscordError { .. } => ErrorCategory::Application,

            Self::InvalidActivity(_)
            | Self::StringOutOfRange { .. }
            | Self::Uninitialized
            | Self::Disposed
            | Self::AlreadyInitialized
            | Self::InvalidConfiguration(_)
            | Self::SystemTimeError(_) => ErrorCategory::Other,
        }
    }

    pub fn is_connection_error(&self) -> bool {
        matches!(self.category(), ErrorCategory::Connection)
    }

    /// Whether a caller retrying the same operation has a reasonable chance
    /// of success. Validation errors are never recoverable; transport
    /// hiccups usually are.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionTimeout(_) | Self::SocketClosed | Self::InvalidResponse(_)
        )
    }

    pub fn discord_error(code: i32, message: impl Into<String>) -> Self {
        Self::DiscordError {
            code,
            message: message.into(),
        }
    }

    pub fn protocol_violation(message: impl Into<String>, context: ProtocolContext) -> Self {
        Self::ProtocolViolation {
            message: message.into(),
            context,
        }
    }

    pub fn string_out_of_range(field: &'static str, limit: usize, actual: usize) -> Self {
        Self::StringOutOfRange {
            field,
            limit,
            actual,
        }
    }
}

impl From<io::Error> for DiscordIpcError {
    fn from(error: io::Error) -> Self {
        Self::ConnectionFailed(error)
    }
}

impl From<serde_json::Error> for DiscordIpcError {
    fn from(error: serde_json::Error) -> Self {
        Self::SerializationFailed(error)
    }
}

/// Result type for Discord IPC operations.
pub type Result<T = ()> = std::result::Result<T, DiscordIpcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_groups_connection_errors() {
        assert_eq!(
            DiscordIpcError::NoValidSocket.category(),
            ErrorCategory::Connection
        );
        assert!(DiscordIpcError::SocketClosed.is_connection_error());
    }

    #[test]
    fn recoverable_excludes_validation_errors() {
        assert!(!DiscordIpcError::InvalidActivity("x".into()).is_recoverable());
        assert!(DiscordIpcError::SocketClosed.is_recoverable());
    }

    #[test]
    fn string_out_of_range_carries_field_detail() {
        let err = DiscordIpcError::string_out_of_range("state", 128, 140);
        match err {
            DiscordIpcError::StringOutOfRange {
                field,
                limit,
                actual,
            } => {
                assert_eq!(field, "state");
                assert_eq!(limit, 128);
                assert_eq!(actual, 140);
            }
            _ => panic!("wrong variant"),
        }
    }
}
