//! The `Message` tagged union (§3, §9): every value the engine can deliver
//! to the client façade, inbound-queue side. Modeled as a single enum with
//! a `kind` discriminant rather than a class hierarchy, per §9's redesign
//! note ("deep inheritance of Message subtypes").

use std::time::Instant;

use crate::subscription::SubscriptionEvent;
use crate::user::{Configuration, User};
use crate::{activity::Activity, error::DiscordIpcError};

/// The payload carried by a [`Message`]. Every variant's name matches the
/// event/command tag that produced it (§3).
#[derive(Debug, Clone)]
pub enum MessageKind {
    Ready {
        config: Configuration,
        user: User,
        version: u32,
    },
    Close {
        code: Option<i32>,
        reason: Option<String>,
    },
    Error {
        code: i32,
        message: String,
    },
    PresenceUpdate {
        presence: Activity,
    },
    Subscribe {
        event: SubscriptionEvent,
    },
    Unsubscribe {
        event: SubscriptionEvent,
    },
    Join {
        secret: String,
    },
    Spectate {
        secret: String,
    },
    JoinRequest {
        user: User,
    },
    ConnectionEstablished {
        pipe: i8,
    },
    ConnectionFailed {
        pipe: i8,
    },
}

/// A single dispatched value, carrying its creation timestamp (§3).
#[derive(Debug, Clone)]
pub struct Message {
    pub kind: MessageKind,
    pub created_at: Instant,
}

impl Message {
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            created_at: Instant::now(),
        }
    }
}

impl From<&DiscordIpcError> for MessageKind {
    /// Translate a server-reported `Error` envelope or a locally detected
    /// protocol violation into the `Error` message variant so it can flow
    /// through the inbound queue like any other dispatched value.
    fn from(err: &DiscordIpcError) -> Self {
        match err {
            DiscordIpcError::DiscordError { code, message } => MessageKind::Error {
                code: *code,
                message: message.clone(),
            },
            other => MessageKind::Error {
                code: -1,
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_records_creation_time() {
        let message = Message::new(MessageKind::ConnectionFailed { pipe: -1 });
        assert!(message.created_at.elapsed().as_secs() < 1);
    }

    #[test]
    fn discord_error_converts_to_error_message() {
        let err = DiscordIpcError::discord_error(4000, "bad command");
        let kind: MessageKind = (&err).into();
        match kind {
            MessageKind::Error { code, message } => {
                assert_eq!(code, 4000);
                assert_eq!(message, "bad command");
            }
            _ => panic!("expected Error variant"),
        }
    }
}
