//! Nonce assignment and tracking for outbound commands.
//!
//! Every outbound command picks a fresh nonce from a process-wide
//! monotonically increasing counter, decimal-stringified. The engine
//! records outstanding nonces in a small map so it can correlate an
//! acknowledgement (or `Error`) frame back to the command tag that
//! produced it; entries expire on ack or after 30 seconds.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::ipc::protocol::Command;

static NONCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// How long an outstanding nonce is tracked before it's considered stale
/// and dropped without a matching response.
pub const NONCE_TIMEOUT: Duration = Duration::from_secs(30);

/// Allocate the next nonce as a decimal string.
pub fn next_nonce() -> String {
    NONCE_COUNTER.fetch_add(1, Ordering::SeqCst).to_string()
}

/// Tracks commands awaiting a nonce-correlated response from Discord.
#[derive(Debug, Default)]
pub struct NonceTracker {
    outstanding: HashMap<String, (Command, Instant)>,
}

impl NonceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `nonce` was just sent as part of `command`.
    pub fn track(&mut self, nonce: String, command: Command) {
        self.outstanding.insert(nonce, (command, Instant::now()));
    }

    /// Remove and return the command tag that produced `nonce`, if it's
    /// still outstanding and not yet expired.
    pub fn resolve(&mut self, nonce: &str) -> Option<Command> {
        match self.outstanding.remove(nonce) {
            Some((command, sent_at)) if sent_at.elapsed() <= NONCE_TIMEOUT => Some(command),
            _ => None,
        }
    }

    /// Drop entries older than [`NONCE_TIMEOUT`], returning how many were
    /// evicted. Call periodically from the engine tick.
    pub fn sweep_expired(&mut self) -> usize {
        let before = self.outstanding.len();
        self.outstanding
            .retain(|_, (_, sent_at)| sent_at.elapsed() <= NONCE_TIMEOUT);
        before - self.outstanding.len()
    }

    pub fn len(&self) -> usize {
        self.outstanding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_nonce_is_monotonically_increasing() {
        let a: u64 = next_nonce().parse().unwrap();
        let b: u64 = next_nonce().parse().unwrap();
        assert!(b > a);
    }

    #[test]
    fn tracker_resolves_outstanding_nonce_once() {
        let mut tracker = NonceTracker::new();
        tracker.track("1".to_string(), Command::SetActivity);

        assert!(matches!(tracker.resolve("1"), Some(Command::SetActivity)));
        assert!(tracker.resolve("1").is_none());
    }

    #[test]
    fn tracker_ignores_unknown_nonce() {
        let mut tracker = NonceTracker::new();
        assert!(tracker.resolve("nope").is_none());
    }

    #[test]
    fn sweep_expired_is_noop_for_fresh_entries() {
        let mut tracker = NonceTracker::new();
        tracker.track("1".to_string(), Command::Subscribe);
        assert_eq!(tracker.sweep_expired(), 0);
        assert_eq!(tracker.len(), 1);
    }
}
