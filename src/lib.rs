//! A background-worker client for Discord Rich Presence IPC.
//!
//! [`DiscordIpcClient`] owns no socket directly: [`DiscordIpcClient::initialize`]
//! spawns a dedicated worker thread that discovers Discord's local IPC pipe,
//! performs the handshake, and keeps the connection alive (reconnecting with
//! backoff, answering pings, re-subscribing after a drop) for as long as the
//! client lives. Application threads enqueue presence updates and
//! subscriptions without blocking on the socket, and read back delivered
//! events either by polling [`DiscordIpcClient::invoke`] or registering a
//! callback via [`DiscordIpcClient::on_message`].
//!
//! ## Example
//!
//! ```no_run
//! use presence_ipc::{ActivityBuilder, DiscordIpcClient};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DiscordIpcClient::new("your_client_id");
//! client.initialize()?;
//!
//! let activity = ActivityBuilder::new()
//!     .state("Playing a game")
//!     .details("In the menu")
//!     .start_timestamp_now()?
//!     .large_image("game_logo")
//!     .large_text("My Awesome Game")
//!     .try_build()?;
//!
//! client.set_presence(Some(activity))?;
//!
//! // Keep the activity for some time...
//! std::thread::sleep(std::time::Duration::from_secs(10));
//!
//! client.set_presence(None)?;
//! client.dispose();
//! # Ok(())
//! # }
//! ```

pub mod activity;
pub mod client;
pub mod engine;
pub mod error;
pub mod ipc;
pub mod logger;
pub mod message;
pub mod nonce;
pub mod process;
pub mod queue;
pub mod retry;
pub mod subscription;
pub mod uri_scheme;
pub mod user;

// Re-export the main public API
pub use activity::{
    Activity, ActivityAssets, ActivityBuilder, ActivityButton, ActivityParty, ActivitySecrets,
    ActivityTimestamps,
};
pub use client::DiscordIpcClient;
pub use error::{DiscordIpcError, Result};
pub use ipc::{Command, Event, IpcConfig, Opcode};
pub use logger::{LogLevel, Logger, NullLogger};
pub use message::{Message, MessageKind};
pub use process::ProcessIdentity;
pub use queue::{Bound, BoundedQueue, PushOutcome};
pub use retry::{with_retry, RetryConfig};
pub use subscription::{SubscriptionEvent, SubscriptionSet};
pub use uri_scheme::{AlwaysRegistered, NeverRegistered, UriSchemeRegistrar};
pub use user::{Configuration, User};
