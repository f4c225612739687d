//! The Pipe Transport: a platform-specific full-duplex byte stream to the
//! running Discord client, plus the length-prefixed frame buffering on top
//! of it.
//!
//! Unlike the teacher's blocking, panic-on-failure `IpcConnection`, every
//! operation here reports failure as a `bool`/`Option` instead of an
//! `Err` — the Connection Engine treats "no pipe yet" and "pipe dropped"
//! as ordinary state transitions, not exceptional control flow.

use std::collections::VecDeque;
use std::io::{Read, Write};

#[cfg(unix)]
use std::os::unix::net::UnixStream;

#[cfg(windows)]
use std::fs::{File, OpenOptions};

use crate::ipc::frame::Frame;
use crate::ipc::protocol::constants;
#[cfg(all(test, unix))]
use crate::ipc::protocol::Opcode;

#[cfg(unix)]
enum Stream {
    Unix(UnixStream),
}

#[cfg(windows)]
enum Stream {
    NamedPipe(File),
}

/// Owns the platform socket/pipe plus a partial-read buffer, since a
/// non-blocking read can return fewer bytes than a full frame header or
/// payload.
pub struct PipeTransport {
    stream: Option<Stream>,
    connected_pipe: i8,
    read_buffer: VecDeque<u8>,
}

impl Default for PipeTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl PipeTransport {
    pub fn new() -> Self {
        Self {
            stream: None,
            connected_pipe: -1,
            read_buffer: VecDeque::new(),
        }
    }

    /// Connect to the given pipe index, or probe `0..10` in order when
    /// `pipe_index` is `-1`. Returns `false` (never an `Err`) when no pipe
    /// accepts a connection; a pipe simply not existing is routine, not
    /// exceptional.
    pub fn connect(&mut self, pipe_index: i8) -> bool {
        let candidates: Vec<u8> = if pipe_index >= 0 {
            vec![pipe_index as u8]
        } else {
            (0..constants::MAX_IPC_SOCKETS).collect()
        };

        for n in candidates {
            if let Some(stream) = Self::try_connect_pipe(n) {
                self.stream = Some(stream);
                self.connected_pipe = n as i8;
                self.read_buffer.clear();
                return true;
            }
        }

        false
    }

    #[cfg(unix)]
    fn try_connect_pipe(n: u8) -> Option<Stream> {
        for dir in Self::unix_candidate_dirs() {
            let path = format!("{dir}/{}{n}", constants::IPC_SOCKET_PREFIX);
            if let Ok(stream) = UnixStream::connect(&path) {
                if stream.set_nonblocking(true).is_ok() {
                    return Some(Stream::Unix(stream));
                }
            }
        }
        None
    }

    /// Candidate base directories for Unix socket discovery, in the order
    /// specified: `XDG_RUNTIME_DIR`, `TMPDIR`, `TMP`, `TEMP`, `/tmp`, then
    /// the snap-confined Discord variants under `/tmp`.
    #[cfg(unix)]
    fn unix_candidate_dirs() -> Vec<String> {
        let mut dirs = Vec::new();
        for key in ["XDG_RUNTIME_DIR", "TMPDIR", "TMP", "TEMP"] {
            if let Ok(dir) = std::env::var(key) {
                dirs.push(dir);
            }
        }
        dirs.push("/tmp".to_string());
        dirs.push("/tmp/snap.discord".to_string());
        dirs.push("/tmp/snap.discord-canary".to_string());
        dirs
    }

    #[cfg(windows)]
    fn try_connect_pipe(n: u8) -> Option<Stream> {
        let path = format!(r"\\.\pipe\discord-ipc-{n}");
        OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .ok()
            .map(Stream::NamedPipe)
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub fn connected_pipe(&self) -> i8 {
        self.connected_pipe
    }

    /// Write a complete frame. Returns `false` (and marks the transport
    /// disconnected) on any I/O failure.
    pub fn write_frame(&mut self, frame: &Frame) -> bool {
        let Ok(encoded) = frame.encode() else {
            return false;
        };

        let wrote = match &mut self.stream {
            #[cfg(unix)]
            Some(Stream::Unix(stream)) => stream.write_all(&encoded).is_ok(),
            #[cfg(windows)]
            Some(Stream::NamedPipe(file)) => file.write_all(&encoded).is_ok(),
            None => false,
        };

        if !wrote {
            self.disconnect();
        }
        wrote
    }

    /// Non-blocking read of one complete frame, if the internal buffer
    /// already holds enough bytes; otherwise pulls whatever is available
    /// from the socket without blocking and tries again.
    pub fn read_frame(&mut self) -> Option<Frame> {
        self.pump_socket_into_buffer();

        if self.read_buffer.len() < constants::IPC_HEADER_SIZE {
            return None;
        }

        let header: Vec<u8> = self
            .read_buffer
            .iter()
            .take(constants::IPC_HEADER_SIZE)
            .copied()
            .collect();
        let mut header_arr = [0u8; constants::IPC_HEADER_SIZE];
        header_arr.copy_from_slice(&header);

        let (opcode, length) = match Frame::decode_header(&header_arr) {
            Ok(parsed) => parsed,
            Err(_) => {
                // Malformed header: drop the connection rather than spin
                // forever on bytes we can't resynchronize from.
                self.disconnect();
                return None;
            }
        };

        let total_needed = constants::IPC_HEADER_SIZE + length as usize;
        if self.read_buffer.len() < total_needed {
            return None;
        }

        self.read_buffer.drain(..constants::IPC_HEADER_SIZE);
        let payload: Vec<u8> = self.read_buffer.drain(..length as usize).collect();

        Some(Frame::new(opcode, payload))
    }

    fn pump_socket_into_buffer(&mut self) {
        let mut scratch = [0u8; 4096];
        loop {
            let read = match &mut self.stream {
                #[cfg(unix)]
                Some(Stream::Unix(stream)) => stream.read(&mut scratch),
                #[cfg(windows)]
                Some(Stream::NamedPipe(file)) => file.read(&mut scratch),
                None => return,
            };

            match read {
                Ok(0) => {
                    self.disconnect();
                    return;
                }
                Ok(n) => self.read_buffer.extend(&scratch[..n]),
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => return,
                Err(_) => {
                    self.disconnect();
                    return;
                }
            }
        }
    }

    /// Tear down the transport. Idempotent.
    pub fn close(&mut self) {
        self.disconnect();
    }

    fn disconnect(&mut self) {
        if let Some(stream) = self.stream.take() {
            match stream {
                #[cfg(unix)]
                Stream::Unix(s) => {
                    let _ = s.shutdown(std::net::Shutdown::Both);
                }
                #[cfg(windows)]
                Stream::NamedPipe(_) => {}
            }
        }
        self.connected_pipe = -1;
        self.read_buffer.clear();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::net::UnixListener;

    #[test]
    fn connect_returns_false_when_no_pipe_listening() {
        std::env::set_var("XDG_RUNTIME_DIR", "/nonexistent-runtime-dir");
        let mut transport = PipeTransport::new();
        assert!(!transport.connect(3));
        assert!(!transport.is_connected());
        assert_eq!(transport.connected_pipe(), -1);
    }

    #[test]
    fn read_frame_buffers_partial_header() {
        let dir = std::env::temp_dir().join(format!("presence-ipc-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::env::set_var("XDG_RUNTIME_DIR", dir.to_str().unwrap());

        let socket_path = dir.join("discord-ipc-5");
        let listener = UnixListener::bind(&socket_path).unwrap();

        let mut transport = PipeTransport::new();
        assert!(transport.connect(5));

        let (mut server_side, _) = listener.accept().unwrap();
        let frame = Frame::new(Opcode::Frame, br#"{"cmd":"DISPATCH"}"#.to_vec());
        let encoded = frame.encode().unwrap();

        server_side.write_all(&encoded[..4]).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        assert!(transport.read_frame().is_none());

        server_side.write_all(&encoded[4..]).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        let received = transport.read_frame().expect("frame should be complete");
        assert_eq!(received.opcode, Opcode::Frame);
        assert_eq!(received.payload, frame.payload);

        let _ = std::fs::remove_file(&socket_path);
    }
}
