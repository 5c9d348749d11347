// SPDX-License-Identifier: MIT
//
// Output buffering and the screen collaborator.
//
//   OutputBuffer: accumulates ANSI bytes in memory so a whole paint reaches
//   the terminal in one write() call instead of one per run.
//
//   Screen: the three primitives the renderer needs from a terminal:
//   its size, "write this text at (col, row)", and flush. Keeping it a
//   trait lets tests paint into a Vec and inspect the exact byte stream.
//
//   AnsiScreen: the real implementation. CUP + text go into an
//   OutputBuffer; flush hands the buffer to any `Write` in one piece.

use std::io::{self, Write};

use crate::ansi;
use crate::terminal;

// ─── OutputBuffer ────────────────────────────────────────────────────────────

/// A byte buffer that accumulates ANSI output for a single `write()`.
///
/// Default capacity: 16 KB, enough for a full repaint of a large terminal
/// in a couple of colors without reallocation.
pub struct OutputBuffer {
    buf: Vec<u8>,
}

const DEFAULT_CAPACITY: usize = 16_384;

impl OutputBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(DEFAULT_CAPACITY),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn push_str(&mut self, s: &str) {
        self.buf.extend_from_slice(s.as_bytes());
    }

    /// Append one character as UTF-8.
    #[inline]
    pub fn push_char(&mut self, ch: char) {
        let mut enc = [0u8; 4];
        self.buf.extend_from_slice(ch.encode_utf8(&mut enc).as_bytes());
    }

    /// Clear for reuse, keeping the allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    /// Write everything to `w`, flush `w`, and clear.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `w` fails. The buffer keeps its
    /// content in that case.
    pub fn flush_to(&mut self, w: &mut impl Write) -> io::Result<()> {
        if !self.buf.is_empty() {
            w.write_all(&self.buf)?;
            self.buf.clear();
        }
        w.flush()
    }
}

impl Write for OutputBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    // Real flushing goes through flush_to().
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// The terminal primitives the renderer paints through.
///
/// Implementations must not reorder writes. Errors are returned as-is;
/// the renderer does not retry.
pub trait Screen {
    /// `(columns, rows)`.
    fn size(&self) -> (u16, u16);

    /// Position the cursor at `(col, row)` (0-based) and write `text`.
    /// Flush afterwards when `flush` is set.
    ///
    /// # Errors
    ///
    /// Any I/O error from the underlying writer.
    fn write_at(&mut self, col: u16, row: u16, text: &str, flush: bool) -> io::Result<()>;

    /// Write `text` at the current cursor position.
    ///
    /// # Errors
    ///
    /// Any I/O error from the underlying writer.
    fn write_raw(&mut self, text: &str) -> io::Result<()>;

    /// Push everything written so far to the terminal.
    ///
    /// # Errors
    ///
    /// Any I/O error from the underlying writer.
    fn flush(&mut self) -> io::Result<()>;
}

// ─── AnsiScreen ──────────────────────────────────────────────────────────────

/// A [`Screen`] that emits CUP sequences into any writer.
///
/// ```
/// use scrim_term::output::{AnsiScreen, Screen};
///
/// let mut screen = AnsiScreen::new(Vec::new(), 80, 24);
/// screen.write_at(2, 0, "hi", true).unwrap();
/// assert_eq!(screen.get_ref().as_slice(), b"\x1b[1;3Hhi");
/// ```
pub struct AnsiScreen<W: Write> {
    out: W,
    buf: OutputBuffer,
    cols: u16,
    rows: u16,
}

impl<W: Write> AnsiScreen<W> {
    #[must_use]
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            buf: OutputBuffer::new(),
            cols,
            rows,
        }
    }

    /// Update the reported size after a terminal resize.
    pub const fn set_size(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    /// Bytes written but not yet flushed.
    #[must_use]
    pub fn pending(&self) -> &[u8] {
        self.buf.as_bytes()
    }

    /// The underlying writer.
    #[must_use]
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    pub const fn get_mut(&mut self) -> &mut W {
        &mut self.out
    }

    /// Recover the writer. Unflushed bytes are dropped.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl AnsiScreen<io::Stdout> {
    /// Stdout, sized to the terminal (80×24 when it cannot be queried).
    #[must_use]
    pub fn stdout() -> Self {
        let size = terminal::get_size().unwrap_or(terminal::Size::FALLBACK);
        Self::new(io::stdout(), size.cols, size.rows)
    }
}

impl<W: Write> Screen for AnsiScreen<W> {
    fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn write_at(&mut self, col: u16, row: u16, text: &str, flush: bool) -> io::Result<()> {
        ansi::cursor_to(&mut self.buf, col, row)?;
        self.buf.push_str(text);
        if flush {
            self.flush()?;
        }
        Ok(())
    }

    fn write_raw(&mut self, text: &str) -> io::Result<()> {
        self.buf.push_str(text);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.buf.flush_to(&mut self.out)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
