// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Stdin reading — raw bytes on a background thread, keys with a timeout.
//
// `StdinReader` owns a thread that polls stdin and sends byte chunks over a
// channel. Polling with a short timeout lets the thread notice its stop
// flag instead of sitting in a blocking `read()` forever.
//
// `KeyReader` sits on the receiving end. It feeds chunks to a key
// `Decoder` and hands out one event at a time. `read_key_timeout` waits on
// the channel with `recv_timeout`, so "no key within N" is a plain `None`
// and never interrupts anything. A lone ESC is held for `escape_timeout`
// and then flushed as the Escape key.

#[cfg(unix)]
use std::io;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::keys::{Decoder, Event};

/// A keypress is a few bytes, a paste can be kilobytes.
const READ_BUF_SIZE: usize = 4096;

/// Upper bound on how long the reader thread takes to notice `stop()`.
const POLL_TIMEOUT_MS: i32 = 50;

// ─── StdinReader ─────────────────────────────────────────────────────────────

/// Background stdin reader thread. Stops and joins on drop.
///
/// ```no_run
/// use scrim_term::reader::StdinReader;
///
/// let (reader, rx) = StdinReader::spawn()?;
/// while let Ok(bytes) = rx.recv() {
///     println!("got {} bytes", bytes.len());
/// }
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct StdinReader {
    handle: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl StdinReader {
    /// Spawn the reader thread. The channel yields non-empty chunks and
    /// closes on stop or EOF.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread.
    pub fn spawn() -> std::io::Result<(Self, Receiver<Vec<u8>>)> {
        let (tx, rx) = mpsc::channel();
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("stdin-reader".into())
            .spawn(move || Self::reader_loop(&tx, &stop_flag))?;

        Ok((
            Self {
                handle: Some(handle),
                stop,
            },
            rx,
        ))
    }

    /// Signal the thread and wait for it. Idempotent.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    #[cfg(unix)]
    fn reader_loop(tx: &mpsc::Sender<Vec<u8>>, stop: &AtomicBool) {
        use std::os::unix::io::AsRawFd;

        let stdin_fd = io::stdin().as_raw_fd();
        let mut buf = [0u8; READ_BUF_SIZE];

        while !stop.load(Ordering::Relaxed) {
            let ready = unsafe {
                let mut pfd = libc::pollfd {
                    fd: stdin_fd,
                    events: libc::POLLIN,
                    revents: 0,
                };
                libc::poll(&raw mut pfd, 1, POLL_TIMEOUT_MS)
            };
            if ready <= 0 {
                continue;
            }

            let n = unsafe { libc::read(stdin_fd, buf.as_mut_ptr().cast(), buf.len()) };
            if n <= 0 {
                tracing::debug!("stdin closed");
                break;
            }

            #[allow(clippy::cast_sign_loss)] // n > 0
            let chunk = buf[..n as usize].to_vec();
            if tx.send(chunk).is_err() {
                break;
            }
        }
    }

    // Blocks in read(), so stop() only returns after the next keypress.
    #[cfg(not(unix))]
    fn reader_loop(tx: &mpsc::Sender<Vec<u8>>, stop: &AtomicBool) {
        use std::io::Read;

        let stdin = std::io::stdin();
        let mut buf = [0u8; READ_BUF_SIZE];

        while !stop.load(Ordering::Relaxed) {
            match stdin.lock().read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if tx.send(buf[..n].to_vec()).is_err() {
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for StdinReader {
    fn drop(&mut self) {
        self.stop();
    }
}

// ─── KeyReader ───────────────────────────────────────────────────────────────

/// Timing for [`KeyReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputConfig {
    /// How long [`KeyReader::read_key`] waits before reporting no key.
    pub key_timeout: Duration,
    /// How long an incomplete escape sequence may wait for its next byte.
    pub escape_timeout: Duration,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            key_timeout: Duration::from_millis(100),
            escape_timeout: Duration::from_millis(50),
        }
    }
}

/// Decoded key and mouse events from a byte channel.
pub struct KeyReader {
    _reader: Option<StdinReader>,
    rx: Receiver<Vec<u8>>,
    decoder: Decoder,
    queue: VecDeque<Event>,
    config: InputConfig,
    closed: bool,
}

impl KeyReader {
    /// Read from stdin on a background thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader thread cannot be spawned.
    pub fn stdin(config: InputConfig) -> std::io::Result<Self> {
        let (reader, rx) = StdinReader::spawn()?;
        Ok(Self {
            _reader: Some(reader),
            ..Self::from_receiver(rx, config)
        })
    }

    /// Read from any byte channel.
    #[must_use]
    pub fn from_receiver(rx: Receiver<Vec<u8>>, config: InputConfig) -> Self {
        Self {
            _reader: None,
            rx,
            decoder: Decoder::new(),
            queue: VecDeque::new(),
            config,
            closed: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> InputConfig {
        self.config
    }

    /// Whether the byte source has closed. Buffered events may remain.
    #[inline]
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// [`read_key_timeout`](Self::read_key_timeout) with the configured
    /// `key_timeout`.
    pub fn read_key(&mut self) -> Option<Event> {
        self.read_key_timeout(self.config.key_timeout)
    }

    /// The next event, or `None` if none arrives within `timeout`.
    ///
    /// An incomplete escape sequence is resolved after `escape_timeout`
    /// even when that runs past `timeout`, so a lone ESC is never lost.
    pub fn read_key_timeout(&mut self, timeout: Duration) -> Option<Event> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Some(event) = self.queue.pop_front() {
                return Some(event);
            }

            let pending = self.decoder.has_pending();
            let wait = if pending {
                self.config.escape_timeout
            } else {
                deadline.saturating_duration_since(Instant::now())
            };

            if self.closed {
                if pending {
                    self.queue.extend(self.decoder.flush());
                    continue;
                }
                return None;
            }

            match self.rx.recv_timeout(wait) {
                Ok(bytes) => self.queue.extend(self.decoder.feed(&bytes)),
                Err(RecvTimeoutError::Timeout) if pending => {
                    self.queue.extend(self.decoder.flush());
                }
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("input channel closed");
                    self.closed = true;
                }
            }

            if self.queue.is_empty() && !self.decoder.has_pending() && Instant::now() >= deadline {
                return None;
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{KeyCode, KeyEvent, Modifiers};
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> Option<Event> {
        Some(Event::Key(KeyEvent::plain(code)))
    }

    fn config() -> InputConfig {
        InputConfig {
            key_timeout: Duration::from_millis(20),
            escape_timeout: Duration::from_millis(10),
        }
    }

    // ── StdinReader ─────────────────────────────────────────────────────

    #[test]
    fn spawn_and_stop() {
        let (mut reader, _rx) = StdinReader::spawn().unwrap();
        reader.stop();
        reader.stop();
    }

    #[test]
    fn drop_stops_reader() {
        let (reader, _rx) = StdinReader::spawn().unwrap();
        drop(reader);
    }

    #[test]
    fn channel_closes_on_stop() {
        let (mut reader, rx) = StdinReader::spawn().unwrap();
        reader.stop();
        while rx.try_recv().is_ok() {}
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    // ── KeyReader ───────────────────────────────────────────────────────

    #[test]
    fn timeout_is_none() {
        let (_tx, rx) = mpsc::channel();
        let mut keys = KeyReader::from_receiver(rx, config());
        assert_eq!(keys.read_key(), None);
        assert!(!keys.is_closed());
    }

    #[test]
    fn events_come_out_one_at_a_time() {
        let (tx, rx) = mpsc::channel();
        let mut keys = KeyReader::from_receiver(rx, config());
        tx.send(b"ab\x1b[A".to_vec()).unwrap();
        assert_eq!(keys.read_key(), key(KeyCode::Char('a')));
        assert_eq!(keys.read_key(), key(KeyCode::Char('b')));
        assert_eq!(keys.read_key(), key(KeyCode::Up));
        assert_eq!(keys.read_key(), None);
    }

    #[test]
    fn lone_escape_resolves_after_escape_timeout() {
        let (tx, rx) = mpsc::channel();
        let mut keys = KeyReader::from_receiver(rx, config());
        tx.send(vec![0x1b]).unwrap();
        assert_eq!(keys.read_key_timeout(Duration::from_millis(1)), key(KeyCode::Escape));
    }

    #[test]
    fn split_sequence_across_chunks() {
        let (tx, rx) = mpsc::channel();
        let mut keys = KeyReader::from_receiver(rx, config());
        tx.send(b"\x1b[5;".to_vec()).unwrap();
        tx.send(b"5~".to_vec()).unwrap();
        assert_eq!(
            keys.read_key(),
            Some(Event::Key(KeyEvent::new(KeyCode::PageUp, Modifiers::CTRL)))
        );
    }

    #[test]
    fn disconnect_drains_then_reports_none() {
        let (tx, rx) = mpsc::channel();
        let mut keys = KeyReader::from_receiver(rx, config());
        tx.send(b"x\x1b".to_vec()).unwrap();
        drop(tx);
        assert_eq!(keys.read_key(), key(KeyCode::Char('x')));
        assert_eq!(keys.read_key(), key(KeyCode::Escape));
        assert_eq!(keys.read_key(), None);
        assert!(keys.is_closed());
    }

    #[test]
    fn default_config_waits_longer_for_keys_than_escapes() {
        let c = InputConfig::default();
        assert!(c.escape_timeout < c.key_timeout);
    }
}
