//! The subscription set: which inbound event classes the user wants pushed
//! from Discord, and the wire event names they map to.
//!
//! User intent is stored immediately on `subscribe`/`unsubscribe`; it is
//! only actually pushed to Discord while the engine is `Ready` and the URI
//! scheme is registered (see [`crate::client::DiscordIpcClient`]).

use bitflags::bitflags;

bitflags! {
    /// Bitset over the three event classes Discord lets applications
    /// subscribe to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SubscriptionSet: u8 {
        const JOIN = 1 << 0;
        const SPECTATE = 1 << 1;
        const JOIN_REQUEST = 1 << 2;
    }
}

/// One event class a caller can subscribe/unsubscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionEvent {
    Join,
    Spectate,
    JoinRequest,
}

impl SubscriptionEvent {
    pub(crate) fn flag(self) -> SubscriptionSet {
        match self {
            Self::Join => SubscriptionSet::JOIN,
            Self::Spectate => SubscriptionSet::SPECTATE,
            Self::JoinRequest => SubscriptionSet::JOIN_REQUEST,
        }
    }

    /// The wire event name (`evt` field) used in Subscribe/Unsubscribe
    /// commands and echoed back on dispatch.
    pub(crate) fn wire_name(self) -> &'static str {
        match self {
            Self::Join => "ACTIVITY_JOIN",
            Self::Spectate => "ACTIVITY_SPECTATE",
            Self::JoinRequest => "ACTIVITY_JOIN_REQUEST",
        }
    }

    pub(crate) fn from_wire_name(name: &str) -> Option<Self> {
        match name {
            "ACTIVITY_JOIN" => Some(Self::Join),
            "ACTIVITY_SPECTATE" => Some(Self::Spectate),
            "ACTIVITY_JOIN_REQUEST" => Some(Self::JoinRequest),
            _ => None,
        }
    }
}

/// The per-event diff between an old and a new [`SubscriptionSet`]: which
/// bits were newly set (need a `Subscribe` command) and which were newly
/// cleared (need an `Unsubscribe` command).
///
/// Short-circuits to empty vectors when `old == new` so a no-op
/// `set_subscription` call never produces wire traffic (§9(c)).
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SubscriptionDiff {
    pub to_subscribe: Vec<SubscriptionEvent>,
    pub to_unsubscribe: Vec<SubscriptionEvent>,
}

pub(crate) fn diff(old: SubscriptionSet, new: SubscriptionSet) -> SubscriptionDiff {
    if old == new {
        return SubscriptionDiff::default();
    }

    const ALL: [SubscriptionEvent; 3] = [
        SubscriptionEvent::Join,
        SubscriptionEvent::Spectate,
        SubscriptionEvent::JoinRequest,
    ];

    let mut out = SubscriptionDiff::default();
    for event in ALL {
        let flag = event.flag();
        let was_set = old.contains(flag);
        let is_set = new.contains(flag);
        if is_set && !was_set {
            out.to_subscribe.push(event);
        } else if was_set && !is_set {
            out.to_unsubscribe.push(event);
        }
    }
    out
}
