//! The Connection Engine: discovery, handshake, reconnect, ping/pong,
//! command pump and event pump, all run on one dedicated worker thread per
//! client.
//!
//! Grounded on the EmbarkStudios `io_loop`/`IoTask` pattern (own-thread
//! worker owning the socket, draining a command channel, publishing
//! events back) but rebuilt over this crate's [`crate::queue::BoundedQueue`]
//! instead of a channel, since the outbound queue needs drop-oldest
//! semantics a channel doesn't give you for free.

pub mod backoff;

use std::sync::atomic::{AtomicBool, AtomicI8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde_json::{json, Value};

use crate::activity::Activity;
use crate::engine::backoff::Backoff;
use crate::ipc::{constants, ArgumentPayload, Command, Frame, HandshakePayload, IpcResponse, Opcode, PipeTransport};
use crate::logger::{self, LogLevel, Logger};
use crate::message::{Message, MessageKind};
use crate::nonce::{self, NonceTracker};
use crate::queue::{BoundedQueue, PushOutcome};
use crate::subscription::{SubscriptionEvent, SubscriptionSet};
use crate::user::{Configuration, User};

const MAX_COMMANDS_PER_TICK: usize = 10;
const MAX_FRAMES_PER_TICK: usize = 50;
const IDLE_PING_AFTER: Duration = Duration::from_secs(15);
const PONG_TIMEOUT: Duration = Duration::from_secs(10);
const TICK_SLEEP: Duration = Duration::from_millis(50);
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
const BACKOFF_MIN_MS: u64 = 500;
const BACKOFF_MAX_MS: u64 = 60_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Disconnected,
    Handshaking,
    Connected,
}

/// Inbound API of the engine: what the client façade enqueues.
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// A null `presence` clears Rich Presence.
    Presence {
        pid: u32,
        presence: Option<Activity>,
    },
    Subscribe {
        event: SubscriptionEvent,
        is_unsub: bool,
    },
    Respond {
        user_id: String,
        accept: bool,
    },
    /// Locally synthesized; not wire-visible on its own (sends an
    /// opcode=Close frame with a reason instead of an `ArgumentPayload`).
    Close,
}

/// The client-facing half of a spawned engine: queues plus a join handle.
pub struct EngineHandle {
    pub outbound: Arc<BoundedQueue<EngineCommand>>,
    pub inbound: Arc<BoundedQueue<Message>>,
    connected: Arc<AtomicBool>,
    connected_pipe: Arc<AtomicI8>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<()>>,
}

impl EngineHandle {
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub fn connected_pipe(&self) -> i8 {
        self.connected_pipe.load(Ordering::Acquire)
    }

    /// Signal the worker to stop and block until it has joined.
    pub fn shutdown(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Spawn the worker thread and return the handle the façade talks to.
#[allow(clippy::too_many_arguments)]
pub fn spawn(
    application_id: String,
    pipe_index: i8,
    outbound_bound: usize,
    inbound_bound: usize,
    logger: Option<Arc<dyn Logger>>,
    thread_name: String,
) -> EngineHandle {
    let outbound = Arc::new(BoundedQueue::new(outbound_bound));
    let inbound = Arc::new(BoundedQueue::new(inbound_bound));
    let shutdown = Arc::new(AtomicBool::new(false));
    let connected = Arc::new(AtomicBool::new(false));
    let connected_pipe = Arc::new(AtomicI8::new(-1));

    let worker = Engine {
        application_id,
        pipe_index,
        transport: PipeTransport::new(),
        state: EngineState::Disconnected,
        backoff: Backoff::new(BACKOFF_MIN_MS, BACKOFF_MAX_MS),
        nonce_tracker: NonceTracker::new(),
        subscription: SubscriptionSet::empty(),
        last_activity: Instant::now(),
        awaiting_pong: false,
        ping_sent_at: None,
        handshake_deadline: None,
        outbound: Arc::clone(&outbound),
        inbound: Arc::clone(&inbound),
        shutdown: Arc::clone(&shutdown),
        connected: Arc::clone(&connected),
        connected_pipe: Arc::clone(&connected_pipe),
        logger,
    };

    let join_handle = thread::Builder::new()
        .name(thread_name)
        .spawn(move || worker.run())
        .expect("failed to spawn Discord RPC worker thread");

    EngineHandle {
        outbound,
        inbound,
        connected,
        connected_pipe,
        shutdown,
        join_handle: Some(join_handle),
    }
}

struct Engine {
    application_id: String,
    pipe_index: i8,
    transport: PipeTransport,
    state: EngineState,
    backoff: Backoff,
    nonce_tracker: NonceTracker,
    /// Cumulative subscription state, re-issued to Discord after a
    /// reconnect (§4.D: "re-issues the last known subscription").
    subscription: SubscriptionSet,
    last_activity: Instant,
    awaiting_pong: bool,
    ping_sent_at: Option<Instant>,
    handshake_deadline: Option<Instant>,
    outbound: Arc<BoundedQueue<EngineCommand>>,
    inbound: Arc<BoundedQueue<Message>>,
    shutdown: Arc<AtomicBool>,
    connected: Arc<AtomicBool>,
    connected_pipe: Arc<AtomicI8>,
    logger: Option<Arc<dyn Logger>>,
}

impl Engine {
    fn run(mut self) {
        loop {
            if self.shutdown.load(Ordering::Acquire) {
                self.handle_shutdown();
                return;
            }

            match self.state {
                EngineState::Disconnected => self.tick_disconnected(),
                EngineState::Handshaking => self.tick_handshaking(),
                EngineState::Connected => self.tick_connected(),
            }

            self.nonce_tracker.sweep_expired();
        }
    }

    fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        logger::dispatch(self.logger.as_deref(), level, message.as_ref());
    }

    fn set_connected_flags(&self, connected: bool) {
        self.connected.store(connected, Ordering::Release);
        self.connected_pipe
            .store(self.transport.connected_pipe(), Ordering::Release);
    }

    fn push_inbound(&self, kind: MessageKind) {
        if let PushOutcome::AcceptedEvicting(_) = self.inbound.push(Message::new(kind)) {
            self.log(LogLevel::Warning, "inbound queue full, dropped oldest message");
        }
    }

    fn tick_disconnected(&mut self) {
        if self.transport.connect(self.pipe_index) {
            self.send_handshake();
            self.state = EngineState::Handshaking;
            self.handshake_deadline = Some(Instant::now() + HANDSHAKE_TIMEOUT);
        } else {
            self.push_inbound(MessageKind::ConnectionFailed { pipe: -1 });
            let backoff = self.backoff.next();
            self.interruptible_sleep(backoff);
        }
    }

    fn send_handshake(&mut self) {
        let payload = HandshakePayload {
            v: constants::IPC_VERSION,
            client_id: self.application_id.clone(),
        };
        if let Ok(bytes) = serde_json::to_vec(&payload) {
            self.transport
                .write_frame(&Frame::new(Opcode::Handshake, bytes));
        }
    }

    fn tick_handshaking(&mut self) {
        if let Some(frame) = self.transport.read_frame() {
            if frame.opcode == Opcode::Frame {
                if let Ok(response) = serde_json::from_slice::<IpcResponse>(&frame.payload) {
                    if response.evt.as_deref() == Some("READY") {
                        self.on_ready(response.data);
                        return;
                    }
                }
            }
            self.log(LogLevel::Warning, "unexpected frame during handshake");
        }

        if !self.transport.is_connected()
            || self
                .handshake_deadline
                .map(|deadline| Instant::now() >= deadline)
                .unwrap_or(false)
        {
            self.transport.close();
            self.state = EngineState::Disconnected;
            self.set_connected_flags(false);
            return;
        }

        thread::sleep(Duration::from_millis(10));
    }

    fn on_ready(&mut self, data: Option<Value>) {
        self.state = EngineState::Connected;
        self.backoff.reset();
        self.last_activity = Instant::now();
        self.awaiting_pong = false;
        self.set_connected_flags(true);

        self.push_inbound(MessageKind::ConnectionEstablished {
            pipe: self.transport.connected_pipe(),
        });

        if let Some(data) = data {
            if let (Ok(config), Ok(user)) = (
                serde_json::from_value::<Configuration>(data["config"].clone()),
                serde_json::from_value::<User>(data["user"].clone()),
            ) {
                let version = data["v"].as_u64().unwrap_or(1) as u32;
                self.push_inbound(MessageKind::Ready {
                    config,
                    user,
                    version,
                });
            } else {
                self.log(LogLevel::Warning, "READY payload missing config/user");
            }
        }

        self.reissue_subscription();
    }

    fn reissue_subscription(&mut self) {
        const ALL: [SubscriptionEvent; 3] = [
            SubscriptionEvent::Join,
            SubscriptionEvent::Spectate,
            SubscriptionEvent::JoinRequest,
        ];
        for event in ALL {
            if self.subscription.contains(event.flag()) {
                self.send_subscribe_command(event, false);
            }
        }
    }

    fn tick_connected(&mut self) {
        let mut batch = Vec::new();
        if let Some(first) = self.outbound.pop_wait(TICK_SLEEP) {
            batch.push(first);
            batch.extend(self.outbound.pop_up_to(MAX_COMMANDS_PER_TICK - 1));
        }

        for command in batch {
            if self.state != EngineState::Connected {
                break;
            }
            self.send_command(command);
        }

        if self.state != EngineState::Connected {
            return;
        }

        let mut frames_read = 0;
        while frames_read < MAX_FRAMES_PER_TICK {
            let Some(frame) = self.transport.read_frame() else {
                break;
            };
            frames_read += 1;
            self.last_activity = Instant::now();
            self.handle_inbound_frame(frame);
            if self.state != EngineState::Connected {
                return;
            }
        }

        if !self.transport.is_connected() {
            self.recycle_connection();
            return;
        }

        self.check_keepalive();
    }

    fn send_command(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Presence { pid, presence } => {
                let nonce = nonce::next_nonce();
                let args = json!({ "pid": pid, "activity": presence });
                self.write_argument_payload(Command::SetActivity, args, nonce);
            }
            EngineCommand::Subscribe { event, is_unsub } => {
                self.send_subscribe_command(event, is_unsub);
            }
            EngineCommand::Respond { user_id, accept } => {
                let nonce = nonce::next_nonce();
                let command = if accept {
                    Command::SendActivityJoinInvite
                } else {
                    Command::CloseActivityJoinRequest
                };
                self.write_argument_payload(command, json!({ "user_id": user_id }), nonce);
            }
            EngineCommand::Close => {
                let payload = json!({ "reason": "client requested disconnect" });
                if let Ok(bytes) = serde_json::to_vec(&payload) {
                    self.transport.write_frame(&Frame::new(Opcode::Close, bytes));
                }
                self.push_inbound(MessageKind::Close {
                    code: None,
                    reason: Some("client requested disconnect".to_string()),
                });
                self.transport.close();
                self.state = EngineState::Disconnected;
                self.set_connected_flags(false);
            }
        }
    }

    fn send_subscribe_command(&mut self, event: SubscriptionEvent, is_unsub: bool) {
        let nonce = nonce::next_nonce();
        let command = if is_unsub {
            Command::Unsubscribe
        } else {
            Command::Subscribe
        };
        let args = json!({ "evt": event.wire_name() });
        self.write_argument_payload(command, args, nonce.clone());

        if is_unsub {
            self.subscription.remove(event.flag());
        } else {
            self.subscription.insert(event.flag());
        }
        self.nonce_tracker.track(nonce, command);
    }

    fn write_argument_payload(&mut self, command: Command, args: Value, nonce: String) {
        let payload = ArgumentPayload {
            cmd: command,
            args,
            nonce: nonce.clone(),
        };
        self.nonce_tracker.track(nonce, command);

        let Ok(bytes) = serde_json::to_vec(&payload) else {
            self.log(LogLevel::Error, "failed to serialize outbound command");
            return;
        };

        if !self.transport.write_frame(&Frame::new(Opcode::Frame, bytes)) {
            self.recycle_connection();
        } else {
            self.last_activity = Instant::now();
        }
    }

    fn handle_inbound_frame(&mut self, frame: Frame) {
        match frame.opcode {
            Opcode::Ping => {
                self.transport.write_frame(&Frame::new(Opcode::Pong, frame.payload));
            }
            Opcode::Pong => {
                self.awaiting_pong = false;
                self.ping_sent_at = None;
            }
            Opcode::Close => {
                let parsed: Value =
                    serde_json::from_slice(&frame.payload).unwrap_or(Value::Null);
                self.push_inbound(MessageKind::Close {
                    code: parsed.get("code").and_then(Value::as_i64).map(|c| c as i32),
                    reason: parsed
                        .get("reason")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                });
                self.recycle_connection();
            }
            Opcode::Frame => self.handle_dispatch_frame(frame.payload),
            Opcode::Handshake => {
                self.log(LogLevel::Warning, "unexpected handshake opcode while connected");
            }
        }
    }

    fn handle_dispatch_frame(&mut self, payload: Vec<u8>) {
        let response: IpcResponse = match serde_json::from_slice(&payload) {
            Ok(response) => response,
            Err(e) => {
                self.log(LogLevel::Warning, format!("malformed frame payload: {e}"));
                return;
            }
        };

        if response.evt.as_deref() == Some("ERROR") {
            let data = response.data.unwrap_or(Value::Null);
            let code = data.get("code").and_then(Value::as_i64).unwrap_or(-1) as i32;
            let message = data
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            self.push_inbound(MessageKind::Error { code, message });
            return;
        }

        if response.cmd.as_deref() == Some("DISPATCH") {
            self.handle_dispatched_event(response.evt.as_deref(), response.data);
            return;
        }

        let Some(nonce) = response.nonce.as_deref() else {
            self.log(LogLevel::Warning, "ack frame missing nonce");
            return;
        };

        let Some(command) = self.nonce_tracker.resolve(nonce) else {
            self.log(LogLevel::Warning, format!("ack for unknown nonce {nonce}"));
            return;
        };

        self.handle_ack(command, response.data);
    }

    fn handle_dispatched_event(&mut self, evt: Option<&str>, data: Option<Value>) {
        let data = data.unwrap_or(Value::Null);
        match evt {
            Some("ACTIVITY_JOIN") => {
                if let Some(secret) = data.get("secret").and_then(Value::as_str) {
                    self.push_inbound(MessageKind::Join {
                        secret: secret.to_string(),
                    });
                }
            }
            Some("ACTIVITY_SPECTATE") => {
                if let Some(secret) = data.get("secret").and_then(Value::as_str) {
                    self.push_inbound(MessageKind::Spectate {
                        secret: secret.to_string(),
                    });
                }
            }
            Some("ACTIVITY_JOIN_REQUEST") => {
                if let Ok(user) = serde_json::from_value::<User>(data["user"].clone()) {
                    self.push_inbound(MessageKind::JoinRequest { user });
                }
            }
            _ => self.log(LogLevel::Warning, format!("unhandled dispatch event {evt:?}")),
        }
    }

    fn handle_ack(&mut self, command: Command, data: Option<Value>) {
        let data = data.unwrap_or(Value::Null);
        match command {
            Command::SetActivity => {
                if data.is_null() {
                    return;
                }
                if let Ok(presence) = serde_json::from_value::<Activity>(data) {
                    self.push_inbound(MessageKind::PresenceUpdate { presence });
                }
            }
            Command::Subscribe | Command::Unsubscribe => {
                let Some(evt) = data.get("evt").and_then(Value::as_str) else {
                    return;
                };
                let Some(event) = SubscriptionEvent::from_wire_name(evt) else {
                    return;
                };
                let kind = if command == Command::Subscribe {
                    MessageKind::Subscribe { event }
                } else {
                    MessageKind::Unsubscribe { event }
                };
                self.push_inbound(kind);
            }
            Command::SendActivityJoinInvite | Command::CloseActivityJoinRequest => {}
            Command::Dispatch => {}
        }
    }

    fn check_keepalive(&mut self) {
        let idle_for = self.last_activity.elapsed();

        if self.awaiting_pong {
            if let Some(sent_at) = self.ping_sent_at {
                if sent_at.elapsed() > PONG_TIMEOUT {
                    self.log(LogLevel::Warning, "no pong within timeout, recycling connection");
                    self.recycle_connection();
                }
            }
            return;
        }

        if idle_for > IDLE_PING_AFTER {
            let payload = json!({ "seq": self.backoff.fail_count() });
            if let Ok(bytes) = serde_json::to_vec(&payload) {
                if self.transport.write_frame(&Frame::new(Opcode::Ping, bytes)) {
                    self.awaiting_pong = true;
                    self.ping_sent_at = Some(Instant::now());
                } else {
                    self.recycle_connection();
                }
            }
        }
    }

    fn recycle_connection(&mut self) {
        self.transport.close();
        self.state = EngineState::Disconnected;
        self.awaiting_pong = false;
        self.ping_sent_at = None;
        self.set_connected_flags(false);
    }

    fn handle_shutdown(&mut self) {
        if self.state == EngineState::Connected {
            let payload = json!({ "reason": "client disposed" });
            if let Ok(bytes) = serde_json::to_vec(&payload) {
                self.transport.write_frame(&Frame::new(Opcode::Close, bytes));
            }
        }
        self.transport.close();
        self.set_connected_flags(false);
    }

    /// Sleep in short slices so a shutdown request lands promptly even
    /// during a multi-second backoff wait.
    fn interruptible_sleep(&self, total: Duration) {
        let step = Duration::from_millis(20);
        let mut slept = Duration::ZERO;
        while slept < total {
            if self.shutdown.load(Ordering::Acquire) {
                return;
            }
            let remaining = total - slept;
            let this_step = step.min(remaining);
            thread::sleep(this_step);
            slept += this_step;
        }
    }
}
