//! Process identity embedded in outbound `SetActivity` commands.
//!
//! Discord uses the sending process's PID to reap Rich Presence when the
//! process exits, so every `SetActivity` command and the close reason sent
//! on shutdown carry it.

/// The PID of the process hosting this client, resolved once at
/// construction rather than re-queried on every command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessIdentity {
    pid: u32,
}

impl ProcessIdentity {
    pub fn current() -> Self {
        Self {
            pid: std::process::id(),
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }
}

impl Default for ProcessIdentity {
    fn default() -> Self {
        Self::current()
    }
}
