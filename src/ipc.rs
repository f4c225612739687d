//! Wire-level plumbing: pipe discovery/transport, frame codec, and the
//! JSON payload shapes exchanged over it.

pub mod connection;
pub mod frame;
pub mod protocol;

pub use connection::PipeTransport;
pub use frame::Frame;
pub use protocol::{
    constants, ArgumentPayload, Command, Event, HandshakePayload, IpcConfig, IpcResponse, Opcode,
};
