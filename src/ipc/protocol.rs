use crate::error::DiscordIpcError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discord IPC Opcodes
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    Handshake = 0,
    Frame = 1,
    Close = 2,
    Ping = 3,
    Pong = 4,
}

impl Opcode {
    /// Check if this opcode is a response to a handshake.
    /// In Discord's IPC protocol, handshake responses actually use the Frame opcode (1).
    pub fn is_handshake_response(&self) -> bool {
        *self == Opcode::Frame
    }

    /// Check if this opcode is a response to a frame.
    pub fn is_frame_response(&self) -> bool {
        *self == Opcode::Frame
    }
}

impl TryFrom<u32> for Opcode {
    type Error = DiscordIpcError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Opcode::Handshake),
            1 => Ok(Opcode::Frame),
            2 => Ok(Opcode::Close),
            3 => Ok(Opcode::Ping),
            4 => Ok(Opcode::Pong),
            _ => Err(DiscordIpcError::InvalidOpcode(value)),
        }
    }
}

impl From<Opcode> for u32 {
    fn from(opcode: Opcode) -> Self {
        opcode as u32
    }
}

/// Outbound command tags. `Dispatch` is never sent by the client directly
/// but appears here because the engine's generic frame encoder shares this
/// type with decoding, where an echoed `cmd` of `DISPATCH` marks an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    Dispatch,
    Subscribe,
    Unsubscribe,
    SetActivity,
    SendActivityJoinInvite,
    CloseActivityJoinRequest,
}

/// Inbound event tags, carried in the `evt` field of a dispatched frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Event {
    Ready,
    Error,
    ActivityJoin,
    ActivitySpectate,
    ActivityJoinRequest,
}

impl Event {
    pub(crate) fn from_str(name: &str) -> Option<Self> {
        serde_json::from_value(Value::String(name.to_string())).ok()
    }
}

/// The outbound envelope shape used for `SetActivity`, `Subscribe`,
/// `Unsubscribe`, and join-invite responses: `{cmd, nonce, args}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArgumentPayload {
    pub cmd: Command,
    pub args: Value,
    pub nonce: String,
}

/// Handshake payload, sent once as opcode=Handshake.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandshakePayload {
    pub v: u32,
    pub client_id: String,
}

/// The generic inbound envelope shape. Covers both dispatched events
/// (`cmd="DISPATCH"`, `evt` set) and nonce-correlated command
/// acknowledgements (`cmd` echoes the original command, `evt` absent).
/// Unknown fields are ignored so the client survives additive protocol
/// changes, per the `serde(default)` on every field below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IpcResponse {
    #[serde(default)]
    pub cmd: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub evt: Option<String>,
    #[serde(default)]
    pub nonce: Option<String>,
}

/// Constants and configuration for Discord IPC protocol.
pub mod constants {
    /// Discord IPC protocol version sent during handshake.
    pub const IPC_VERSION: u32 = 1;

    /// Discord creates numbered IPC sockets from 0 to 9
    /// (`discord-ipc-0` through `discord-ipc-9`), one per running client
    /// instance (Stable, PTB, Canary). Scanning all 10 covers them.
    pub const MAX_IPC_SOCKETS: u8 = 10;

    /// IPC socket name prefix used for socket discovery.
    pub const IPC_SOCKET_PREFIX: &str = "discord-ipc-";

    /// Default connection retry interval in milliseconds, used when
    /// auto-discovery fails to find an available socket.
    pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 100;

    /// Maximum size of an inbound frame's payload (16 KiB). A larger
    /// advertised length is a protocol error, not merely rejected data.
    pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024;

    /// Maximum size accepted on the encode path for an outbound frame.
    /// Deliberately far more generous than the inbound limit: outbound
    /// payloads are produced locally and are never attacker-controlled,
    /// but a caller who builds a pathological `Activity` should still get
    /// a clear error instead of an unbounded allocation.
    pub const MAX_OUTBOUND_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

    /// Size of the IPC message header in bytes: 4-byte opcode + 4-byte
    /// length, both little-endian.
    pub const IPC_HEADER_SIZE: usize = 8;
}

/// Configuration for Discord IPC protocol behavior.
///
/// Allows customization of protocol parameters for different Discord
/// setups or special use cases (testing, non-standard installations).
#[derive(Debug, Clone)]
pub struct IpcConfig {
    /// Maximum number of socket instances to scan during auto-discovery.
    pub max_sockets: u8,

    /// Retry interval in milliseconds when connection fails.
    pub retry_interval_ms: u64,

    /// Maximum allowed inbound payload size in bytes.
    pub max_payload_size: u32,

    /// IPC protocol version to use in handshake.
    pub ipc_version: u32,
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            max_sockets: constants::MAX_IPC_SOCKETS,
            retry_interval_ms: constants::DEFAULT_RETRY_INTERVAL_MS,
            max_payload_size: constants::MAX_PAYLOAD_SIZE,
            ipc_version: constants::IPC_VERSION,
        }
    }
}

impl IpcConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration optimized for faster connection attempts, useful
    /// when the caller knows Discord is already running.
    pub fn fast_connect() -> Self {
        Self {
            max_sockets: 3,
            retry_interval_ms: 50,
            ..Default::default()
        }
    }

    /// A configuration for testing or non-standard Discord installations:
    /// more sockets scanned, longer retry interval.
    pub fn extended() -> Self {
        Self {
            max_sockets: 10,
            retry_interval_ms: 200,
            ..Default::default()
        }
    }

    pub fn with_max_sockets(mut self, max_sockets: u8) -> Self {
        self.max_sockets = max_sockets;
        self
    }

    pub fn with_retry_interval(mut self, retry_interval_ms: u64) -> Self {
        self.retry_interval_ms = retry_interval_ms;
        self
    }

    pub fn with_max_payload_size(mut self, max_payload_size: u32) -> Self {
        self.max_payload_size = max_payload_size;
        self
    }

    /// Returns `Err` with a human-readable reason if any parameter is out
    /// of its acceptable range.
    pub fn validate(&self) -> std::result::Result<(), &'static str> {
        if self.max_sockets == 0 {
            return Err("max_sockets must be greater than 0");
        }
        if self.max_sockets > 100 {
            return Err("max_sockets exceeds reasonable limit (100)");
        }
        if self.retry_interval_ms == 0 {
            return Err("retry_interval_ms must be greater than 0");
        }
        if self.retry_interval_ms > 10_000 {
            return Err("retry_interval_ms exceeds reasonable limit (10 seconds)");
        }
        if self.max_payload_size < 1024 {
            return Err("max_payload_size too small (minimum 1 KB)");
        }
        if self.max_payload_size > 100 * 1024 * 1024 {
            return Err("max_payload_size too large (maximum 100 MB)");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_wire_names_are_screaming_snake_case() {
        assert_eq!(
            serde_json::to_value(Command::SendActivityJoinInvite).unwrap(),
            Value::String("SEND_ACTIVITY_JOIN_INVITE".into())
        );
        assert_eq!(
            serde_json::to_value(Command::SetActivity).unwrap(),
            Value::String("SET_ACTIVITY".into())
        );
    }

    #[test]
    fn event_from_str_parses_wire_names() {
        assert_eq!(Event::from_str("READY"), Some(Event::Ready));
        assert_eq!(Event::from_str("ACTIVITY_JOIN_REQUEST"), Some(Event::ActivityJoinRequest));
        assert_eq!(Event::from_str("NOT_A_REAL_EVENT"), None);
    }

    #[test]
    fn ipc_response_ignores_unknown_fields() {
        let json = serde_json::json!({
            "cmd": "DISPATCH",
            "evt": "READY",
            "data": {},
            "nonce": null,
            "some_future_field": 42
        });
        let response: IpcResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.cmd.as_deref(), Some("DISPATCH"));
        assert_eq!(response.evt.as_deref(), Some("READY"));
    }

    #[test]
    fn opcode_round_trips_through_u32() {
        for raw in 0..=4u32 {
            let opcode = Opcode::try_from(raw).unwrap();
            assert_eq!(u32::from(opcode), raw);
        }
        assert!(Opcode::try_from(99).is_err());
    }
}
