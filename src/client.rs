//! The client façade: the single type applications construct and drive.
//!
//! Owns no socket itself — construction spawns a [`crate::engine`] worker
//! thread that owns the transport, and every public method here either
//! enqueues a command for that thread or drains/reads state it published
//! back. Mirrors the teacher's `DiscordIpcClient`, generalized from a
//! single blocking `connect`/`set_activity`/`clear_activity` trio into the
//! always-connected, non-blocking background-worker model.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::activity::Activity;
use crate::engine::{self, EngineCommand, EngineHandle};
use crate::error::{DiscordIpcError, Result};
use crate::logger::{LogLevel, Logger};
use crate::message::{Message, MessageKind};
use crate::process::ProcessIdentity;
use crate::subscription::{self, SubscriptionEvent, SubscriptionSet};
use crate::uri_scheme::{AlwaysRegistered, UriSchemeRegistrar};
use crate::user::{Configuration, User};

/// Bound applied to both the outbound command queue and the inbound
/// message queue unless overridden.
const DEFAULT_QUEUE_BOUND: usize = 256;
const DEFAULT_THREAD_NAME: &str = "Discord RPC";

type EventCallback = Arc<dyn Fn(Message) + Send + Sync>;

/// Discord IPC client.
///
/// Construct with [`DiscordIpcClient::new`], register a callback with
/// [`DiscordIpcClient::on_message`] (push mode, the default), then call
/// [`DiscordIpcClient::initialize`] to spawn the worker thread. Pass
/// `false` to [`DiscordIpcClient::with_auto_events`] before initializing
/// to switch to pull mode and poll [`DiscordIpcClient::invoke`] instead.
///
/// ```no_run
/// use presence_ipc::{ActivityBuilder, DiscordIpcClient};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = DiscordIpcClient::new("0123456789").with_auto_events(false);
/// client.initialize()?;
///
/// let activity = ActivityBuilder::new()
///     .state("Playing a game")
///     .details("In the menu")
///     .start_timestamp_now()?
///     .large_image("game_logo")
///     .try_build()?;
///
/// client.set_presence(Some(activity))?;
/// for message in client.invoke() {
///     println!("{:?}", message.kind);
/// }
/// client.dispose();
/// # Ok(())
/// # }
/// ```
pub struct DiscordIpcClient {
    application_id: String,
    pipe_index: i8,
    logger: Option<Arc<dyn Logger>>,
    registrar: Arc<dyn UriSchemeRegistrar>,
    process: ProcessIdentity,
    auto_events: bool,
    thread_name: String,
    outbound_bound: usize,
    inbound_bound: usize,
    callback: Arc<Mutex<Option<EventCallback>>>,
    state: Arc<Mutex<ClientState>>,
}

struct ClientState {
    engine: Option<EngineHandle>,
    disposed: bool,
    current_presence: Option<Activity>,
    current_user: Option<User>,
    configuration: Option<Configuration>,
    subscription: SubscriptionSet,
    dispatcher: Option<JoinHandle<()>>,
    dispatcher_shutdown: Arc<AtomicBool>,
}

impl Default for ClientState {
    fn default() -> Self {
        Self {
            engine: None,
            disposed: false,
            current_presence: None,
            current_user: None,
            configuration: None,
            subscription: SubscriptionSet::empty(),
            dispatcher: None,
            dispatcher_shutdown: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Apply one delivered message to tracked client state (§4.F): merge a
/// `PresenceUpdate` into `current_presence`, capture a `Ready`'s
/// `config`/`user`, mask a `Subscribe`/`Unsubscribe` bit in/out of
/// `subscription`. Shared by both [`DiscordIpcClient::invoke`] (pull mode)
/// and the push-mode dispatcher thread so tracked state and getters stay
/// accurate regardless of which delivery mode is active.
fn apply_message_to_state(state: &mut ClientState, kind: &MessageKind) {
    match kind {
        MessageKind::PresenceUpdate { presence } => {
            let mut current = state.current_presence.clone().unwrap_or_default();
            current.merge(presence.clone());
            state.current_presence = Some(current);
        }
        MessageKind::Ready { config, user, .. } => {
            state.configuration = Some(config.clone());
            state.current_user = Some(user.clone());
        }
        MessageKind::Subscribe { event } => {
            state.subscription.insert(event.flag());
        }
        MessageKind::Unsubscribe { event } => {
            state.subscription.remove(event.flag());
        }
        _ => {}
    }
}

impl DiscordIpcClient {
    /// Create a client for `application_id` with auto-discovery (scans all
    /// numbered pipes), no logger, an always-registered URI scheme, and
    /// push-mode event delivery. Call [`Self::initialize`] before using it.
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            pipe_index: -1,
            logger: None,
            registrar: Arc::new(AlwaysRegistered),
            process: ProcessIdentity::current(),
            auto_events: true,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            outbound_bound: DEFAULT_QUEUE_BOUND,
            inbound_bound: DEFAULT_QUEUE_BOUND,
            callback: Arc::new(Mutex::new(None)),
            state: Arc::new(Mutex::new(ClientState::default())),
        }
    }

    /// Pin connection attempts to a specific pipe index (`0..=9`) instead
    /// of scanning all of them.
    pub fn with_pipe_index(mut self, pipe_index: u8) -> Self {
        self.pipe_index = pipe_index as i8;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_registrar(mut self, registrar: Arc<dyn UriSchemeRegistrar>) -> Self {
        self.registrar = registrar;
        self
    }

    /// Enable push-mode event delivery: messages are handed to the
    /// callback registered via [`Self::on_message`] from a dedicated
    /// dispatch thread instead of accumulating for [`Self::invoke`].
    pub fn with_auto_events(mut self, auto_events: bool) -> Self {
        self.auto_events = auto_events;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Register the callback used in push mode. Has no effect unless
    /// [`Self::with_auto_events`] was set before [`Self::initialize`].
    pub fn on_message(&self, callback: impl Fn(Message) + Send + Sync + 'static) {
        *self.callback.lock().unwrap() = Some(Arc::new(callback));
    }

    fn lock_state(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap()
    }

    fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        crate::logger::dispatch(self.logger.as_deref(), level, message.as_ref());
    }

    /// Spawn the worker thread. Idempotent failure mode: calling this twice
    /// without an intervening [`Self::dispose`] returns
    /// [`DiscordIpcError::AlreadyInitialized`].
    pub fn initialize(&self) -> Result {
        let mut state = self.lock_state();
        if state.disposed {
            return Err(DiscordIpcError::Disposed);
        }
        if state.engine.is_some() {
            return Err(DiscordIpcError::AlreadyInitialized);
        }

        state.engine = Some(engine::spawn(
            self.application_id.clone(),
            self.pipe_index,
            self.outbound_bound,
            self.inbound_bound,
            self.logger.clone(),
            self.thread_name.clone(),
        ));

        if self.auto_events {
            self.spawn_dispatcher(&mut state);
        }

        Ok(())
    }

    fn spawn_dispatcher(&self, state: &mut ClientState) {
        let Some(engine) = state.engine.as_ref() else {
            return;
        };
        let inbound = Arc::clone(&engine.inbound);
        let callback_slot = Arc::clone(&self.callback);
        let shared_state = Arc::clone(&self.state);
        let shutdown = Arc::clone(&state.dispatcher_shutdown);
        shutdown.store(false, Ordering::Release);

        let handle = thread::spawn(move || {
            while !shutdown.load(Ordering::Acquire) {
                let Some(message) = inbound.pop_wait(Duration::from_millis(100)) else {
                    continue;
                };
                apply_message_to_state(&mut shared_state.lock().unwrap(), &message.kind);
                if let Some(callback) = callback_slot.lock().unwrap().clone() {
                    callback(message);
                }
            }
        });

        state.dispatcher = Some(handle);
    }

    /// Drain and return every message currently queued, oldest first,
    /// applying each to the client's own tracked state as it goes: a
    /// `PresenceUpdate` is merged into `current_presence`, a `Ready`
    /// captures `configuration`/`current_user`, and a `Subscribe`/
    /// `Unsubscribe` masks the corresponding bit into `subscription`.
    ///
    /// Intended for pull mode; in push mode the dispatcher thread already
    /// drained the queue, so this always returns empty.
    pub fn invoke(&self) -> Vec<Message> {
        let mut state = self.lock_state();
        let drained = match state.engine.as_ref() {
            Some(engine) => engine.inbound.drain_all(),
            None => Vec::new(),
        };
        for message in &drained {
            apply_message_to_state(&mut state, &message.kind);
        }
        drained
    }

    /// The last Rich Presence sent or merged from a server acknowledgement,
    /// guarded by the client mutex.
    pub fn current_presence(&self) -> Option<Activity> {
        self.lock_state().current_presence.clone()
    }

    /// The user reported in the handshake's `Ready` event, if any,
    /// guarded by the client mutex.
    pub fn current_user(&self) -> Option<User> {
        self.lock_state().current_user.clone()
    }

    /// The configuration reported in the handshake's `Ready` event, if
    /// any, guarded by the client mutex.
    pub fn configuration(&self) -> Option<Configuration> {
        self.lock_state().configuration.clone()
    }

    /// The subscription bits currently believed to be active, guarded by
    /// the client mutex.
    pub fn subscription(&self) -> SubscriptionSet {
        self.lock_state().subscription
    }

    pub fn is_connected(&self) -> bool {
        self.lock_state()
            .engine
            .as_ref()
            .map(EngineHandle::is_connected)
            .unwrap_or(false)
    }

    pub fn connected_pipe(&self) -> i8 {
        self.lock_state()
            .engine
            .as_ref()
            .map(EngineHandle::connected_pipe)
            .unwrap_or(-1)
    }

    fn send_command(&self, state: &ClientState, command: EngineCommand) -> Result {
        let engine = state.engine.as_ref().ok_or(DiscordIpcError::Uninitialized)?;
        engine.outbound.push(command);
        Ok(())
    }

    /// Replace the current Rich Presence wholesale. `None` clears it.
    ///
    /// Unlike every other command-sending method, this is exempt from the
    /// `Uninitialized` rule: calling it before [`Self::initialize`] simply
    /// stores the state for [`Self::synchronize_state`] to send once the
    /// client connects, rather than erroring.
    pub fn set_presence(&self, presence: Option<Activity>) -> Result {
        if let Some(activity) = &presence {
            activity.validate()?;
        }

        let mut state = self.lock_state();
        state.current_presence = presence.clone();

        if state.engine.is_none() {
            self.log(
                LogLevel::Info,
                "set_presence called before initialize; stored for later synchronize",
            );
            return Ok(());
        }

        let pid = self.process.pid();
        self.send_command(&state, EngineCommand::Presence { pid, presence })
    }

    /// Re-send the cached presence and subscription set. Useful after a
    /// caller-visible reconnect notification, or to flush a presence set
    /// via [`Self::set_presence`] before [`Self::initialize`] was called,
    /// though the engine already re-issues the subscription set on its
    /// own after every handshake.
    pub fn synchronize_state(&self) -> Result {
        let state = self.lock_state();
        let presence = state.current_presence.clone();
        if let Some(activity) = &presence {
            activity.validate()?;
        }
        let pid = self.process.pid();
        self.send_command(&state, EngineCommand::Presence { pid, presence })
    }

    fn mutate_presence(&self, f: impl FnOnce(&mut Activity)) -> Result {
        let mut state = self.lock_state();
        let mut presence = state.current_presence.clone().unwrap_or_default();
        f(&mut presence);
        presence.validate()?;
        state.current_presence = Some(presence.clone());
        let pid = self.process.pid();
        self.send_command(
            &state,
            EngineCommand::Presence {
                pid,
                presence: Some(presence),
            },
        )
    }

    pub fn update_state(&self, state_text: impl Into<String>) -> Result {
        let state_text = state_text.into();
        self.mutate_presence(|activity| activity.state = Some(state_text))
    }

    pub fn update_details(&self, details: impl Into<String>) -> Result {
        let details = details.into();
        self.mutate_presence(|activity| activity.details = Some(details))
    }

    pub fn update_large_image(&self, key: impl Into<String>, text: Option<String>) -> Result {
        let key = key.into();
        self.mutate_presence(|activity| {
            let assets = activity.assets.get_or_insert_with(Default::default);
            assets.large_image = Some(key);
            assets.large_text = text;
        })
    }

    pub fn update_small_image(&self, key: impl Into<String>, text: Option<String>) -> Result {
        let key = key.into();
        self.mutate_presence(|activity| {
            let assets = activity.assets.get_or_insert_with(Default::default);
            assets.small_image = Some(key);
            assets.small_text = text;
        })
    }

    /// Set the party id and size/max unconditionally. Unlike
    /// [`Self::update_party_size`], this path goes through plain
    /// `validate()` and is rejected outright if `max < size`.
    pub fn update_party(&self, id: impl Into<String>, size: u32, max: u32) -> Result {
        let id = id.into();
        self.mutate_presence(|activity| {
            activity.party = Some(crate::activity::ActivityParty {
                id: Some(id),
                size: Some([size, max]),
            });
        })
    }

    /// Set the party size, coercing out-of-range values into a valid pair
    /// instead of rejecting them: `size` is floored at 1 and `max` is
    /// raised to at least `size`. Preserves the existing party id if any.
    pub fn update_party_size(&self, size: u32, max: u32) -> Result {
        let size = size.max(1);
        let max = max.max(size);
        self.mutate_presence(|activity| {
            let party = activity.party.get_or_insert_with(Default::default);
            party.size = Some([size, max]);
        })
    }

    #[cfg(feature = "secrets")]
    pub fn update_secrets(&self, join: Option<String>, spectate: Option<String>) -> Result {
        self.mutate_presence(|activity| {
            activity.secrets = Some(crate::activity::ActivitySecrets {
                join,
                spectate,
                match_secret: None,
            });
        })
    }

    pub fn update_start_time(&self, start: i64) -> Result {
        self.mutate_presence(|activity| {
            let timestamps = activity.timestamps.get_or_insert_with(Default::default);
            timestamps.start = Some(start);
        })
    }

    pub fn update_end_time(&self, end: i64) -> Result {
        self.mutate_presence(|activity| {
            let timestamps = activity.timestamps.get_or_insert_with(Default::default);
            timestamps.end = Some(end);
        })
    }

    pub fn clear_time(&self) -> Result {
        self.mutate_presence(|activity| activity.timestamps = None)
    }

    /// Subscribe or unsubscribe from one event class. No-op (no wire
    /// traffic) if the requested state already matches the current one.
    pub fn set_subscription(&self, event: SubscriptionEvent, subscribed: bool) -> Result {
        if subscribed && !self.registrar.is_registered(&self.application_id) {
            return Err(DiscordIpcError::InvalidConfiguration(
                "application is not registered for its Discord URI scheme".to_string(),
            ));
        }

        let mut state = self.lock_state();
        let old = state.subscription;
        let mut new = old;
        if subscribed {
            new.insert(event.flag());
        } else {
            new.remove(event.flag());
        }

        let delta = subscription::diff(old, new);
        if delta.to_subscribe.is_empty() && delta.to_unsubscribe.is_empty() {
            return Ok(());
        }

        state.subscription = new;
        for event in delta.to_subscribe {
            self.send_command(
                &state,
                EngineCommand::Subscribe {
                    event,
                    is_unsub: false,
                },
            )?;
        }
        for event in delta.to_unsubscribe {
            self.send_command(
                &state,
                EngineCommand::Subscribe {
                    event,
                    is_unsub: true,
                },
            )?;
        }
        Ok(())
    }

    pub fn subscribe(&self, event: SubscriptionEvent) -> Result {
        self.set_subscription(event, true)
    }

    pub fn unsubscribe(&self, event: SubscriptionEvent) -> Result {
        self.set_subscription(event, false)
    }

    /// Accept or reject a pending `ActivityJoinRequest`.
    pub fn respond(&self, user_id: impl Into<String>, accept: bool) -> Result {
        let state = self.lock_state();
        self.send_command(
            &state,
            EngineCommand::Respond {
                user_id: user_id.into(),
                accept,
            },
        )
    }

    /// Request a graceful disconnect without tearing down the worker
    /// thread; the engine returns to `Disconnected` and will reconnect on
    /// its own. Use [`Self::dispose`] to stop the worker entirely.
    pub fn disconnect(&self) -> Result {
        let state = self.lock_state();
        self.send_command(&state, EngineCommand::Close)
    }

    fn stop_worker(&self, state: &mut ClientState) {
        state.dispatcher_shutdown.store(true, Ordering::Release);
        if let Some(handle) = state.dispatcher.take() {
            let _ = handle.join();
        }
        if let Some(mut engine) = state.engine.take() {
            engine.shutdown();
        }
    }

    /// Terminal stop: joins the worker thread and the push-mode dispatcher
    /// (if any) and latches the client `Disposed`. Safe to call more than
    /// once; subsequent calls are no-ops. A disposed client cannot be
    /// re-initialized; [`Self::initialize`] will return
    /// [`DiscordIpcError::Disposed`]. Use [`Self::deinitialize`] for a
    /// graceful stop that allows restarting.
    pub fn dispose(&self) {
        let mut state = self.lock_state();
        if state.disposed {
            return;
        }
        state.disposed = true;
        self.stop_worker(&mut state);
        self.log(LogLevel::Info, "client disposed");
    }

    /// Graceful stop: joins the worker thread and the push-mode dispatcher
    /// (if any), same as [`Self::dispose`], but does not latch the
    /// terminal `Disposed` state — a subsequent [`Self::initialize`]
    /// spawns a fresh worker instead of erroring. No-op if the client has
    /// no running worker (including if it was already [`Self::dispose`]d).
    pub fn deinitialize(&self) {
        let mut state = self.lock_state();
        if state.disposed || state.engine.is_none() {
            return;
        }
        self.stop_worker(&mut state);
        self.log(LogLevel::Info, "client deinitialized");
    }
}

impl Drop for DiscordIpcClient {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl Default for DiscordIpcClient {
    fn default() -> Self {
        Self::new(String::new())
    }
}
