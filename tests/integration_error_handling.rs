use presence_ipc::error::{ErrorCategory, ProtocolContext};
use presence_ipc::ipc::Opcode;
use presence_ipc::DiscordIpcError;

#[test]
fn error_category_matches_constructor() {
    let error = DiscordIpcError::SocketClosed;
    assert!(error.is_connection_error());
    assert_eq!(error.category(), ErrorCategory::Connection);

    let protocol_error = DiscordIpcError::InvalidResponse("bad".into());
    assert_eq!(protocol_error.category(), ErrorCategory::Protocol);
    assert!(protocol_error.is_recoverable());

    let app_error = DiscordIpcError::discord_error(5001, "Discord failure");
    assert_eq!(app_error.category(), ErrorCategory::Application);
    assert!(!app_error.is_recoverable());
}

#[test]
fn protocol_violation_context_is_preserved() {
    let context = ProtocolContext {
        expected_opcode: Some(Opcode::Handshake.into()),
        received_opcode: Some(Opcode::Frame.into()),
        payload_size: None,
    };
    let error = DiscordIpcError::protocol_violation("unexpected opcode", context.clone());

    match error {
        DiscordIpcError::ProtocolViolation {
            context: received, ..
        } => {
            assert_eq!(received.expected_opcode, context.expected_opcode);
            assert_eq!(received.received_opcode, context.received_opcode);
        }
        other => panic!("unexpected error variant: {other:?}"),
    }
}
